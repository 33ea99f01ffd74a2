// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates app names while parsing.

use serde::Deserialize;

use crate::types::AppName;

pub fn deserialize_app_name_option<'de, D>(deserializer: D) -> Result<Option<AppName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| AppName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}
