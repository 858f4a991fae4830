//! Form input
//!
//! Form traversal is reduced to a capability: anything able to list its
//! labeled input and select elements can be tokenized.

use std::collections::BTreeMap;

use serde::Deserialize;

pub mod extractor;

pub use extractor::{ExtractedForm, FormExtractor};

pub trait FormSource: Send + Sync {
    /// Input elements first, then select elements.
    fn fields(&self) -> Vec<LabeledField>;
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LabeledField {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub element: FieldElement,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum FieldElement {
    Input {
        #[serde(default)]
        value: String,
    },
    Select {
        options: Vec<String>,
        selected_index: Option<usize>,
    },
}

impl LabeledField {
    pub fn input(attr_key: &str, binding: &str, value: &str) -> Self {
        Self {
            attributes: BTreeMap::from([(attr_key.to_owned(), binding.to_owned())]),
            element: FieldElement::Input { value: value.to_owned() },
        }
    }

    pub fn select(attr_key: &str, binding: &str, options: &[&str], selected_index: usize) -> Self {
        Self {
            attributes: BTreeMap::from([(attr_key.to_owned(), binding.to_owned())]),
            element: FieldElement::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
                selected_index: Some(selected_index),
            },
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Current value, `None` for a select without a valid selection.
    pub fn value(&self) -> Option<&str> {
        match &self.element {
            FieldElement::Input { value } => Some(value.as_str()),
            FieldElement::Select { options, selected_index } => selected_index
                .and_then(|idx| options.get(idx))
                .map(String::as_str),
        }
    }
}

/// In-memory form, e.g. loaded from a YAML/JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormFields(pub Vec<LabeledField>);

impl FormSource for FormFields {
    fn fields(&self) -> Vec<LabeledField> {
        let (inputs, selects): (Vec<_>, Vec<_>) = self
            .0
            .iter()
            .cloned()
            .partition(|f| matches!(f.element, FieldElement::Input { .. }));
        inputs.into_iter().chain(selects).collect()
    }
}
