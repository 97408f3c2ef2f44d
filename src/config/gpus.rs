use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct Gpus {
    pub(crate) enabled: bool,
}

impl Default for Gpus {
    fn default() -> Self {
        Gpus { enabled: true }
    }
}
