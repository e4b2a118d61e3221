use std::borrow::Cow;

#[cmt_derive::cmt_error]
pub enum SampleError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(input: &str) -> Result<u32, SampleError> {
    let n: u32 = input.parse().context("Parsing sample input")?;
    Ok(n)
}

#[test]
fn question_mark_converts_source_with_context() {
    let err = parse("not-a-number").unwrap_err();
    match err {
        SampleError::Parse { context, .. } => {
            assert_eq!(context.as_deref(), Some("Parsing sample input"));
        },
        other => panic!("expected Parse variant, got {other:?}"),
    }
}

#[test]
fn context_attaches_to_existing_error() {
    let result: Result<(), SampleError> =
        Err(SampleError::Validation { message: "bad slug".into(), context: None });
    let err = result.context("Creating conference").unwrap_err();
    assert!(err.to_string().contains("Creating conference"));
}

#[test]
fn internal_variant_converts_from_strings() {
    let from_static: SampleError = "boom".into();
    assert!(matches!(from_static, SampleError::Internal { .. }));

    let from_owned: SampleError = String::from("boom").into();
    assert!(from_owned.to_string().contains("boom"));
}

#[test]
fn display_omits_empty_context() {
    let err = SampleError::Validation { message: "bad slug".into(), context: None };
    assert_eq!(err.to_string(), "Validation error: bad slug");
}
