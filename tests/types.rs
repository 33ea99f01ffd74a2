// ABOUTME: Integration tests for validated names and per-deployment identifiers.
// ABOUTME: Tests app name rules, uid formatting and key name derivation.

use headless::types::*;

mod app_name_tests {
    use super::*;

    #[test]
    fn accepts_platform_style_names() {
        for name in ["a", "acme", "acme-web", "app2", "a-b-c-1"] {
            assert!(AppName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(AppName::new(""), Err(AppNameError::Empty));
    }

    #[test]
    fn rejects_leading_digit_or_hyphen() {
        assert_eq!(AppName::new("1app"), Err(AppNameError::StartsWithNonLetter));
        assert_eq!(AppName::new("-app"), Err(AppNameError::StartsWithNonLetter));
    }

    #[test]
    fn rejects_trailing_hyphen() {
        assert_eq!(AppName::new("app-"), Err(AppNameError::EndsWithHyphen));
    }

    #[test]
    fn rejects_uppercase_and_symbols() {
        assert_eq!(AppName::new("Acme"), Err(AppNameError::NotLowercase));
        assert!(AppName::new("acme_web").is_err());
        assert!(AppName::new("acme.web").is_err());
    }

    #[test]
    fn length_limit_is_thirty() {
        let max = "a".repeat(30);
        assert!(AppName::new(&max).is_ok());
        assert_eq!(AppName::new(&"a".repeat(31)), Err(AppNameError::TooLong));
    }

    #[test]
    fn parses_from_str() {
        let name: AppName = "acme-web".parse().unwrap();
        assert_eq!(name.to_string(), "acme-web");
    }
}

mod uid_tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn display_is_hyphenated_lowercase() {
        let uid: DeployUid = "0F8FAD5B-D9CB-469F-A165-70867728950E".parse().unwrap();
        assert_eq!(uid.to_string(), "0f8fad5b-d9cb-469f-a165-70867728950e");
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-uid".parse::<DeployUid>().is_err());
    }

    #[test]
    fn generated_uids_are_unique() {
        let source = RandomUid;
        let uids: HashSet<_> = (0..1000).map(|_| source.generate()).collect();
        assert_eq!(uids.len(), 1000);
    }

    #[test]
    fn key_name_derives_from_uid_only() {
        let uid = DeployUid::generate();
        assert_eq!(KeyName::for_uid(&uid), KeyName::for_uid(&uid));
        assert_eq!(KeyName::for_uid(&uid).as_str(), format!("deployer-{uid}"));
    }
}
