// ABOUTME: Property and example tests for command-line tokenising and quoting.
// ABOUTME: Quoting any argument and splitting it again must give the argument back.

use headless::config::{CommandLine, CommandLineError, quote, split};
use proptest::prelude::*;

#[test]
fn handles_mixed_quoting() {
    assert_eq!(
        split(r#"git commit -m "it's \"done\"" --author='A B'"#).unwrap(),
        vec!["git", "commit", "-m", r#"it's "done""#, "--author=A B"]
    );
}

#[test]
fn empty_quotes_are_an_argument() {
    assert_eq!(split("ssh-keygen -N ''").unwrap(), vec!["ssh-keygen", "-N", ""]);
}

#[test]
fn reports_errors() {
    assert_eq!(
        split("echo 'open"),
        Err(CommandLineError::UnterminatedQuote('\''))
    );
    assert_eq!(split("echo \\"), Err(CommandLineError::TrailingBackslash));
    assert_eq!(
        CommandLine::from("   ").to_argv(),
        Err(CommandLineError::Empty)
    );
}

proptest! {
    #[test]
    fn quote_then_split_round_trips(arg in "\\PC*") {
        prop_assert_eq!(split(&quote(&arg)).unwrap(), vec![arg]);
    }

    #[test]
    fn args_survive_remote_rendering(args in prop::collection::vec("[ -~]{0,12}", 1..6)) {
        let line = CommandLine::Args(args.clone()).to_shell();
        prop_assert_eq!(split(&line).unwrap(), args);
    }
}
