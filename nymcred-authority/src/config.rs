//! Authority configuration.

use serde::{Deserialize, Serialize};

/// Parameters the certifying authority is set up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Names of the attributes the authority certifies, in credential order.
    pub attribute_names: Vec<String>,
}

impl Config {
    /// Configure an authority certifying the given attributes.
    pub fn new<S: AsRef<str>>(attribute_names: &[S]) -> Self {
        Self {
            attribute_names: attribute_names
                .iter()
                .map(|name| name.as_ref().to_owned())
                .collect(),
        }
    }
}
