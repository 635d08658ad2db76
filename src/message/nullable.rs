use serde::{Deserialize, Deserializer};

/// The judge writes empty lists and strings as `null`. Read those as the zero value, the same as
/// a missing field.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq, Eq)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "or_default")]
        items: Vec<u64>,
        #[serde(deserialize_with = "or_default")]
        text: String,
    }

    #[test]
    fn null_missing_and_present() {
        let sample: Sample = serde_json::from_str(r#"{"items":null,"text":null}"#).unwrap();
        assert_eq!(sample, Sample::default());

        let sample: Sample = serde_json::from_str("{}").unwrap();
        assert_eq!(sample, Sample::default());

        let sample: Sample = serde_json::from_str(r#"{"items":[1,2],"text":"x"}"#).unwrap();
        assert_eq!(sample.items, vec![1, 2]);
        assert_eq!(sample.text, "x");
    }

    #[test]
    fn wrong_type_is_still_an_error() {
        assert!(serde_json::from_str::<Sample>(r#"{"items":"many"}"#).is_err());
    }
}
