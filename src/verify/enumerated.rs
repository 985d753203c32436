use crate::client::Channel;
use crate::error::{DemoError, DemoResult};
use crate::nt::NT_ENUM;

use super::{compare_value, Verification, Verifier};

/// NTEnum: moves `value.index` to a different choice and checks the label.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumVerifier;

impl Verifier for EnumVerifier {
    fn schema(&self) -> &'static str {
        NT_ENUM
    }

    fn run(&self, channel: &Channel) -> DemoResult<Verification> {
        let mut v = Verification::new();
        let mut put_get = channel.create_put_get()?;

        let (choices, before) = {
            let e = put_get.put_data().structure().enumerated("value")?;
            (e.choices.to_vec(), e.index)
        };
        let listing = choices.join(", ");
        if choices.len() < 2 {
            v.fail(format!(
                "\tenum({listing}) has fewer than two choices; nothing to switch to"
            ));
            return Ok(v);
        }

        let current = usize::try_from(before).unwrap_or(0) % choices.len();
        let next = (current + 1) % choices.len();
        let write = i32::try_from(next)
            .map_err(|_| DemoError::internal("enum choice index exceeds i32"))?;
        let expected_label = choices[next].clone();

        v.line(format!(
            "\tBefore write: enum({listing}) = {}",
            choices.get(current).map_or("?", String::as_str)
        ));

        put_get.put_data_mut().put("value.index", write)?;
        put_get.execute()?;

        let after = put_get.get_data().enumerated("value")?;
        let label = after.label().unwrap_or("<out of range>");
        v.line(format!("\t After write: enum({listing}) = {label}"));

        compare_value(&mut v, "index", &write, &after.index);
        compare_value(&mut v, "label", expected_label.as_str(), label);
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::Client;
    use crate::nt::nt_enum;
    use crate::service::{InMemoryRecordService, RecordService};

    #[test]
    fn test_enum_switches_to_one() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc.clone()).channel("enum").unwrap();
        let v = EnumVerifier.run(&ch).unwrap();
        assert!(v.success(), "{}", v.transcript());
        assert!(v.transcript().contains("After write: enum(zero, one) = one"));
        assert_eq!(svc.get("enum").unwrap().enumerated("value").unwrap().index, 1);
    }

    #[test]
    fn test_enum_is_idempotent() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc).channel("enum").unwrap();
        assert!(EnumVerifier.run(&ch).unwrap().success());
        assert!(EnumVerifier.run(&ch).unwrap().success());
    }

    #[test]
    fn test_enum_single_choice_fails() {
        let svc = Arc::new(InMemoryRecordService::new());
        svc.host("lonely", nt_enum(&["only"])).unwrap();
        let ch = Client::new(svc).channel("lonely").unwrap();
        let v = EnumVerifier.run(&ch).unwrap();
        assert!(!v.success());
    }

    #[test]
    fn test_enum_on_wrong_schema_is_field_error() {
        let svc = Arc::new(InMemoryRecordService::with_standard_database());
        let ch = Client::new(svc).channel("int").unwrap();
        let err = EnumVerifier.run(&ch).unwrap_err();
        assert!(err.is_field_access());
    }
}
