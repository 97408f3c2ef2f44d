use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct Sinfo {
    pub(crate) command: String,
}

impl Default for Sinfo {
    fn default() -> Self {
        Sinfo {
            command: "sinfo".to_string(),
        }
    }
}
