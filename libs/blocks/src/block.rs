use serde::Serialize;

/// A block of a view form, tagged by `type` on the wire.
///
/// ```
/// use blocks::{Block, Select};
///
/// let block: Block = Select::new("team", "Team")
///     .add_option("Backend", "be", true)
///     .add_option("Frontend", "fe", false)
///     .into();
/// let json = serde_json::to_value(&block).unwrap();
/// assert_eq!(json["type"], "select");
/// assert_eq!(json["options"][0]["selected"], true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: String },
    PlainText { text: String },
    Markdown { text: String },
    Divider,
    Input(Input),
    Select(Select),
    Radio(Radio),
    Checkbox(Checkbox),
    Date(DateInput),
    Time(TimeInput),
    #[serde(rename = "file_input")]
    Files(FileInput),
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header { text: text.into() }
    }

    pub fn plain_text(text: impl Into<String>) -> Self {
        Block::PlainText { text: text.into() }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Block::Markdown { text: text.into() }
    }

    /// Wire value of the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header { .. } => "header",
            Block::PlainText { .. } => "plain_text",
            Block::Markdown { .. } => "markdown",
            Block::Divider => "divider",
            Block::Input(_) => "input",
            Block::Select(_) => "select",
            Block::Radio(_) => "radio",
            Block::Checkbox(_) => "checkbox",
            Block::Date(_) => "date",
            Block::Time(_) => "time",
            Block::Files(_) => "file_input",
        }
    }
}

/// Option of a select, radio, or checkbox block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOption {
    pub text: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub selected: bool,
}

/// Text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Input {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    pub multiline: bool,
    pub required: bool,
}

impl Input {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: None,
            hint: None,
            initial_value: None,
            min_length: None,
            max_length: None,
            multiline: false,
            required: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Zero removes the bound.
    pub fn length(mut self, min: u32, max: u32) -> Self {
        self.min_length = (min > 0).then_some(min);
        self.max_length = (max > 0).then_some(max);
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

macro_rules! choice_block {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        pub struct $name {
            pub name: String,
            pub label: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub hint: Option<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            pub options: Vec<BlockOption>,
            pub required: bool,
        }

        impl $name {
            pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    label: label.into(),
                    hint: None,
                    options: Vec::new(),
                    required: false,
                }
            }

            pub fn hint(mut self, hint: impl Into<String>) -> Self {
                self.hint = Some(hint.into());
                self
            }

            pub fn required(mut self, required: bool) -> Self {
                self.required = required;
                self
            }

            fn push_option(
                mut self,
                text: impl Into<String>,
                value: impl Into<String>,
                description: Option<String>,
                selected: bool,
            ) -> Self {
                self.options.push(BlockOption {
                    text: text.into(),
                    value: value.into(),
                    description,
                    selected,
                });
                self
            }
        }
    };
}

choice_block!(
    /// Drop-down list.
    Select
);
choice_block!(
    /// Group of radio buttons.
    Radio
);
choice_block!(
    /// Group of checkboxes.
    Checkbox
);

impl Select {
    pub fn add_option(
        self,
        text: impl Into<String>,
        value: impl Into<String>,
        selected: bool,
    ) -> Self {
        self.push_option(text, value, None, selected)
    }

    pub fn add_option_if(
        self,
        cond: bool,
        text: impl Into<String>,
        value: impl Into<String>,
        selected: bool,
    ) -> Self {
        if !cond {
            return self;
        }
        self.add_option(text, value, selected)
    }
}

macro_rules! described_options {
    ($($name:ident),+) => {
        $(
            impl $name {
                pub fn add_option(
                    self,
                    text: impl Into<String>,
                    value: impl Into<String>,
                    description: impl Into<String>,
                    selected: bool,
                ) -> Self {
                    let description = description.into();
                    let description = (!description.is_empty()).then_some(description);
                    self.push_option(text, value, description, selected)
                }

                pub fn add_option_if(
                    self,
                    cond: bool,
                    text: impl Into<String>,
                    value: impl Into<String>,
                    description: impl Into<String>,
                    selected: bool,
                ) -> Self {
                    if !cond {
                        return self;
                    }
                    self.add_option(text, value, description, selected)
                }
            }
        )+
    };
}

described_options!(Radio, Checkbox);

/// Date picker; the initial value is sent as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateInput {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_date: Option<String>,
    pub required: bool,
}

impl DateInput {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            hint: None,
            initial_date: None,
            required: false,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn set(mut self, year: i32, month: u8, day: u8) -> Self {
        self.initial_date = Some(format!("{year}-{month:02}-{day:02}"));
        self
    }

    pub fn set_if(self, cond: bool, year: i32, month: u8, day: u8) -> Self {
        if !cond {
            return self;
        }
        self.set(year, month, day)
    }

    pub fn set_date(self, date: time::Date) -> Self {
        self.set(date.year(), u8::from(date.month()), date.day())
    }

    pub fn set_date_if(self, cond: bool, date: time::Date) -> Self {
        if !cond {
            return self;
        }
        self.set_date(date)
    }
}

/// Time picker; the initial value is sent as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInput {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_time: Option<String>,
    pub required: bool,
}

impl TimeInput {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            hint: None,
            initial_time: None,
            required: false,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn set(mut self, hour: u8, minute: u8) -> Self {
        self.initial_time = Some(format!("{hour:02}:{minute:02}"));
        self
    }

    pub fn set_if(self, cond: bool, hour: u8, minute: u8) -> Self {
        if !cond {
            return self;
        }
        self.set(hour, minute)
    }

    pub fn set_time(self, time: time::Time) -> Self {
        self.set(time.hour(), time.minute())
    }

    pub fn set_time_if(self, cond: bool, time: time::Time) -> Self {
        if !cond {
            return self;
        }
        self.set_time(time)
    }
}

/// File attachment input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInput {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filetypes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_files: Option<u32>,
    pub required: bool,
}

impl FileInput {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            hint: None,
            filetypes: Vec::new(),
            max_files: None,
            required: false,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn filetypes<I, S>(mut self, filetypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filetypes = filetypes.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_files(mut self, max_files: u32) -> Self {
        self.max_files = (max_files > 0).then_some(max_files);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

macro_rules! into_block {
    ($($shape:ident => $variant:ident),+) => {
        $(
            impl From<$shape> for Block {
                fn from(value: $shape) -> Self {
                    Block::$variant(value)
                }
            }
        )+
    };
}

into_block!(
    Input => Input,
    Select => Select,
    Radio => Radio,
    Checkbox => Checkbox,
    DateInput => Date,
    TimeInput => Time,
    FileInput => Files
);
