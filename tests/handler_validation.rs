use cli_dsl::Cli;
use cli_dsl::builder::errors::BuildError;
use cli_dsl::handler::errors::HandlerError;

#[path = "common/mod.rs"]
mod common;

#[test]
fn command_without_handle_fails_with_missing_handler() {
    let err = common::build_err(|root| {
        root.command("start", |c| {
            c.description("Start specified program");
            Ok(())
        })
    });

    assert_eq!(err.label(), Some("command \"start\""));
    assert!(matches!(
        common::handler_err(&err),
        HandlerError::MissingHandler
    ));
    assert!(err.to_string().starts_with("command \"start\": "));
}

#[test]
fn handle_without_bind_fails_with_args_not_bound() {
    let err = common::build_err(|root| {
        root.command("stop", |c| {
            let _ = c.handle(common::two);
            Ok(())
        })
    });

    assert_eq!(err.label(), Some("command \"stop\""));
    match common::handler_err(&err) {
        HandlerError::ArgsNotBound { callback } => assert!(callback.ends_with("two")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn binding_too_few_arguments_fails_with_arity_mismatch() {
    let err = common::build_err(|root| {
        root.command("stop", |c| c.handle(common::three).bind(("a", "b")))
    });

    assert_eq!(err.label(), Some("command \"stop\""));
    assert!(matches!(
        common::handler_err(&err),
        HandlerError::ArityMismatch {
            expected: 3,
            got: 2,
            ..
        }
    ));
}

#[test]
fn flag_handlers_are_not_required_to_bind() {
    let cli = Cli::build(|root| {
        root.flag("-q --quiet", |f| {
            let _ = f.handle(common::noop);
            Ok(())
        })?;
        root.flag("-n --dry-run", |_| Ok(()))?;
        Ok(())
    })
    .expect("flags without bound handlers are allowed");

    assert!(cli.root().flags[0].handler.callback().is_some());
    assert!(!cli.root().flags[0].handler.args_bound());
    assert!(cli.root().flags[1].handler.callback().is_none());
}

#[test]
fn arity_mismatch_on_a_flag_handler_is_unlabelled() {
    let err = common::build_err(|root| {
        root.flag("-v --version", |f| f.handle(common::two).bind(("1.0",)))?;
        Ok(())
    });

    assert_eq!(err.label(), None);
    assert!(matches!(
        common::handler_err(&err),
        HandlerError::ArityMismatch {
            expected: 2,
            got: 1,
            ..
        }
    ));
}

#[test]
fn nested_failure_reports_the_innermost_command_only() {
    let err = common::build_err(|root| {
        root.command("outer", |c| {
            c.command("inner", |_| Ok(()))?;
            common::handled(c)
        })
    });

    assert_eq!(err.label(), Some("command \"inner\""));
    assert!(matches!(
        common::handler_err(&err),
        HandlerError::MissingHandler
    ));
}

#[test]
fn first_failure_aborts_the_remaining_declarations() {
    let mut reached = false;
    let err = common::build_err(|root| {
        root.command("broken", |_| Ok(()))?;
        reached = true;
        root.command("fine", common::handled)
    });

    assert!(!reached);
    assert_eq!(err.label(), Some("command \"broken\""));
}

#[test]
fn rebinding_after_handle_replaces_the_callback() {
    let cli = Cli::build(|root| {
        root.command("start", |c| {
            c.handle(common::three).bind(("a", "b", 1))?;
            c.handle(common::noop).bind(())
        })
    })
    .expect("last registration wins");

    let handler = &cli.root().commands[0].handler;
    assert_eq!(handler.callback().map(|cb| cb.arity()), Some(0));
    assert!(handler.bound_args().is_empty());
}

#[test]
fn bound_flag_from_another_assembly_is_rejected() {
    let mut foreign = None;
    Cli::build(|root| {
        foreign = Some(root.option("--a", |f| f.default("from-a"))?);
        Ok(())
    })
    .expect("first tree assembles");
    let foreign = foreign.expect("flag declared");

    let err = common::build_err(|root| {
        root.option("--b", |f| f.default("from-b"))?;
        root.command("go", |c| c.handle(|_: String| {}).bind((foreign,)))
    });

    assert_eq!(err.label(), Some("command \"go\""));
    assert_eq!(
        err.root_cause().to_string(),
        "Bind() got flag '#0' which was not declared by this builder."
    );
}

#[test]
fn bound_flag_from_a_sibling_command_is_rejected() {
    let err = common::build_err(|root| {
        let mut only_start = None;
        root.command("start", |c| {
            only_start = Some(c.flag("--only-start", |_| Ok(()))?);
            common::handled(c)
        })?;
        let only_start = only_start.expect("flag declared");
        root.command("stop", |c| c.handle(|_: String| {}).bind((only_start,)))
    });

    match err.root_cause() {
        BuildError::InvalidArgument { flag, reason } => {
            assert_eq!(flag, "--only-start");
            assert_eq!(*reason, "is not visible from this command");
        }
        other => panic!("unexpected error: {other}"),
    }
}
