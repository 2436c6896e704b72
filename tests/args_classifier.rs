//! Tests for the tokenizer/classifier.

use infrawrap::args::{
    classify, ArgsError, ClassifyPolicy, FlagKind, FlagRegistry, FlagSpec, FlagValue, TokenClass,
    ToolFlag,
};

fn raw_args(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

fn registry() -> FlagRegistry {
    FlagRegistry::from_specs([
        FlagSpec::string("stack").shorthand('s'),
        FlagSpec::string("identity").sentinel("SELECT"),
        FlagSpec::bool("verbose"),
        FlagSpec::bool("dry-run").sentinel("true"),
        FlagSpec::int("parallelism").shorthand('p'),
        FlagSpec::string_list("var-file"),
        FlagSpec::string("from-plan"),
    ])
    .unwrap()
}

fn wrapping() -> ClassifyPolicy {
    ClassifyPolicy::default()
}

fn native_only() -> ClassifyPolicy {
    ClassifyPolicy {
        wraps_tool: false,
        ..ClassifyPolicy::default()
    }
}

fn classes(args: &[String]) -> Vec<TokenClass> {
    classify(args, &registry(), &wrapping())
        .unwrap()
        .tokens
        .into_iter()
        .map(|t| t.class)
        .collect()
}

// =============================================================================
// FLAG FORMS
// =============================================================================

#[test]
fn long_flag_with_separate_value() {
    let args = raw_args(vec!["--stack", "prod"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();

    assert_eq!(result.values["stack"], FlagValue::String("prod".into()));
    assert_eq!(
        classes(&args),
        vec![
            TokenClass::NativeFlag("stack".into()),
            TokenClass::NativeFlagValue("stack".into()),
        ]
    );
}

#[test]
fn equals_forms() {
    for form in ["--stack=prod", "-s=prod"] {
        let args = raw_args(vec![form]);
        let result = classify(&args, &registry(), &wrapping()).unwrap();
        assert_eq!(result.values["stack"], FlagValue::String("prod".into()), "{form}");
        assert_eq!(result.tokens[0].class, TokenClass::NativeFlag("stack".into()));
    }
}

#[test]
fn single_dash_long_name_with_equals() {
    let args = raw_args(vec!["-from-plan=plan.out"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["from-plan"], FlagValue::String("plan.out".into()));
}

#[test]
fn single_dash_long_name_bare_is_not_native() {
    let args = raw_args(vec!["-stack", "prod"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert!(result.values.is_empty());
    assert_eq!(result.unclassified(), vec!["-stack", "prod"]);
}

#[test]
fn equals_value_is_taken_after_first_equals() {
    let args = raw_args(vec!["--stack=a=b"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["stack"], FlagValue::String("a=b".into()));
}

#[test]
fn empty_equals_value_is_present() {
    let args = raw_args(vec!["--identity="]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["identity"], FlagValue::String(String::new()));
}

// =============================================================================
// OPTIONAL-VALUE SENTINEL
// =============================================================================

#[test]
fn sentinel_flag_alone_never_consumes_next_token() {
    let args = raw_args(vec!["--identity", "plan"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();

    assert_eq!(result.values["identity"], FlagValue::String("SELECT".into()));
    assert_eq!(result.unclassified(), vec!["plan"]);
}

#[test]
fn sentinel_flag_at_end_of_input() {
    let args = raw_args(vec!["plan", "--dry-run"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["dry-run"], FlagValue::Bool(true));
}

#[test]
fn sentinel_flag_with_explicit_value() {
    let args = raw_args(vec!["--identity=admin", "--dry-run=false"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["identity"], FlagValue::String("admin".into()));
    assert_eq!(result.values["dry-run"], FlagValue::Bool(false));
}

// =============================================================================
// VALUE CONSUMPTION
// =============================================================================

#[test]
fn value_flag_consumes_flag_looking_token() {
    let args = raw_args(vec!["--stack", "-var", "foo=bar"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();

    assert_eq!(result.values["stack"], FlagValue::String("-var".into()));
    assert_eq!(result.unclassified(), vec!["foo=bar"]);
}

#[test]
fn value_flag_consumes_separator_token() {
    let args = raw_args(vec!["--stack", "--", "x"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();

    assert_eq!(result.values["stack"], FlagValue::String("--".into()));
    assert!(!result.has_separator());
    assert_eq!(result.unclassified(), vec!["x"]);
}

#[test]
fn bool_without_sentinel_consumes_and_parses_next_token() {
    let args = raw_args(vec!["--verbose", "YES", "plan"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["verbose"], FlagValue::Bool(true));
    assert_eq!(result.unclassified(), vec!["plan"]);

    let args = raw_args(vec!["--verbose", "0"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["verbose"], FlagValue::Bool(false));

    let args = raw_args(vec!["--verbose", ""]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["verbose"], FlagValue::Bool(true));
}

#[test]
fn bool_with_garbage_value_is_malformed() {
    let args = raw_args(vec!["--verbose", "plan"]);
    let err = classify(&args, &registry(), &wrapping()).unwrap_err();
    assert_eq!(
        err,
        ArgsError::MalformedFlagValue {
            flag: "verbose".into(),
            kind: FlagKind::Bool,
            token: "plan".into(),
        }
    );
    assert!(err.to_string().contains("plan"));
    assert!(err.to_string().contains("--verbose"));
}

#[test]
fn int_flag_parses_or_fails() {
    let args = raw_args(vec!["-p", "8"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["parallelism"], FlagValue::Int(8));

    let args = raw_args(vec!["--parallelism=lots"]);
    let err = classify(&args, &registry(), &wrapping()).unwrap_err();
    assert!(matches!(
        err,
        ArgsError::MalformedFlagValue { flag, token, .. } if flag == "parallelism" && token == "lots"
    ));
}

#[test]
fn missing_value_at_end_of_input() {
    let args = raw_args(vec!["plan", "-s"]);
    let err = classify(&args, &registry(), &wrapping()).unwrap_err();
    assert_eq!(err, ArgsError::MissingFlagValue { flag: "stack".into() });
}

#[test]
fn string_list_accumulates_in_encounter_order() {
    let args = raw_args(vec!["--var-file", "a.tfvars", "plan", "--var-file=b.tfvars"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(
        result.values["var-file"],
        FlagValue::StringList(vec!["a.tfvars".into(), "b.tfvars".into()])
    );
}

#[test]
fn repeated_scalar_keeps_last_occurrence() {
    let args = raw_args(vec!["-s", "dev", "--stack=prod"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.values["stack"], FlagValue::String("prod".into()));
}

// =============================================================================
// SEPARATOR AND UNKNOWN FLAGS
// =============================================================================

#[test]
fn everything_after_separator_passes_through() {
    let args = raw_args(vec!["plan", "--", "--stack", "x", "--", "-s=1"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();

    assert!(result.values.is_empty());
    assert_eq!(result.pass_through_tail(), vec!["--stack", "x", "--", "-s=1"]);
    assert_eq!(result.unclassified(), vec!["plan"]);
    assert_eq!(result.consumed_count(), 1);
}

#[test]
fn custom_separator() {
    let policy = ClassifyPolicy {
        separator: ":::".into(),
        wraps_tool: true,
    };
    let args = raw_args(vec!["-s", "dev", ":::", "--", "-s"]);
    let result = classify(&args, &registry(), &policy).unwrap();

    assert_eq!(result.values["stack"], FlagValue::String("dev".into()));
    assert_eq!(result.pass_through_tail(), vec!["--", "-s"]);
}

#[test]
fn unknown_double_dash_flag_passes_when_wrapping_a_tool() {
    let args = raw_args(vec!["--auto-approve", "-var", "x=1"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    assert_eq!(result.unclassified(), vec!["--auto-approve", "-var", "x=1"]);
}

#[test]
fn unknown_double_dash_flag_fails_without_a_tool() {
    let args = raw_args(vec!["--auto-approve"]);
    let err = classify(&args, &registry(), &native_only()).unwrap_err();
    assert_eq!(err, ArgsError::UnknownFlag { token: "--auto-approve".into() });

    let args = raw_args(vec!["--colour=auto"]);
    let err = classify(&args, &registry(), &native_only()).unwrap_err();
    assert_eq!(err, ArgsError::UnknownFlag { token: "--colour=auto".into() });
}

#[test]
fn unknown_single_dash_flag_is_unclassified_without_a_tool() {
    let args = raw_args(vec!["-var", "x=1", "-"]);
    let result = classify(&args, &registry(), &native_only()).unwrap();
    assert_eq!(result.unclassified(), vec!["-var", "x=1", "-"]);
}

#[test]
fn token_indices_follow_the_raw_vector() {
    let args = raw_args(vec!["plan", "-s", "dev", "vpc"]);
    let result = classify(&args, &registry(), &wrapping()).unwrap();
    let indices: Vec<usize> = result.tokens.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    let raws: Vec<&str> = result.tokens.iter().map(|t| t.raw.as_str()).collect();
    assert_eq!(raws, vec!["plan", "-s", "dev", "vpc"]);
}

// =============================================================================
// TOOL FLAGS
// =============================================================================

fn registry_with_tool_flags() -> FlagRegistry {
    let mut registry = registry();
    registry
        .extend_tool_flags([
            ToolFlag::value("-var"),
            ToolFlag::value("-out"),
            ToolFlag::switch("-auto-approve"),
        ])
        .unwrap();
    registry
}

#[test]
fn tool_value_flag_takes_the_next_token() {
    let args = raw_args(vec!["plan", "-var", "foo=bar", "vpc"]);
    let result = classify(&args, &registry_with_tool_flags(), &wrapping()).unwrap();

    let classes: Vec<TokenClass> = result.tokens.iter().map(|t| t.class.clone()).collect();
    assert_eq!(
        classes,
        vec![
            TokenClass::Unclassified,
            TokenClass::ToolArg,
            TokenClass::ToolArg,
            TokenClass::Unclassified,
        ]
    );
    assert_eq!(result.tool_args(), vec!["-var", "foo=bar"]);
    assert_eq!(result.unclassified(), vec!["plan", "vpc"]);
    assert_eq!(result.consumed_count(), 0);
}

#[test]
fn tool_value_flag_takes_flag_looking_tokens() {
    let args = raw_args(vec!["-out", "-s", "-var", "--", "-s", "dev"]);
    let result = classify(&args, &registry_with_tool_flags(), &wrapping()).unwrap();

    assert_eq!(result.tool_args(), vec!["-out", "-s", "-var", "--"]);
    assert!(!result.has_separator());
    assert_eq!(result.values["stack"], FlagValue::String("dev".into()));
}

#[test]
fn tool_switch_and_equals_form_stand_alone() {
    let args = raw_args(vec!["-auto-approve", "vpc", "-var=a=b", "plan"]);
    let result = classify(&args, &registry_with_tool_flags(), &wrapping()).unwrap();

    assert_eq!(result.tool_args(), vec!["-auto-approve", "-var=a=b"]);
    assert_eq!(result.unclassified(), vec!["vpc", "plan"]);
}

#[test]
fn tool_value_flag_at_end_of_input_is_forwarded_alone() {
    let args = raw_args(vec!["plan", "-var"]);
    let result = classify(&args, &registry_with_tool_flags(), &wrapping()).unwrap();
    assert_eq!(result.tool_args(), vec!["-var"]);
}

#[test]
fn tool_flags_after_the_separator_are_plain_pass_through() {
    let args = raw_args(vec!["--", "-var", "x=1"]);
    let result = classify(&args, &registry_with_tool_flags(), &wrapping()).unwrap();
    assert!(result.tool_args().is_empty());
    assert_eq!(result.pass_through_tail(), vec!["-var", "x=1"]);
}

#[test]
fn double_dash_spelling_is_not_a_tool_flag() {
    let args = raw_args(vec!["--var", "x=1"]);
    let result = classify(&args, &registry_with_tool_flags(), &wrapping()).unwrap();
    assert!(result.tool_args().is_empty());
    assert_eq!(result.unclassified(), vec!["--var", "x=1"]);
}
