//! Building blocks for Pachca view forms and the values they submit.
//!
//! Forms are described with [`Block`]s; when a user submits one, the view
//! webhook carries the entered values, which decode into the types in
//! [`data`].
pub mod block;
pub mod data;

pub use block::{
    Block, BlockOption, Checkbox, DateInput, FileInput, Input, Radio, Select, TimeInput,
};
pub use data::{FormDate, FormFile, FormFiles, FormOptions, FormTime, FormValueError};
