use std::panic::{self, AssertUnwindSafe};

use cli_dsl::Cli;
use cli_dsl::builder::errors::BuildError;
use cli_dsl::handler::errors::HandlerError;
use cli_dsl::scope::Target;

#[path = "common/mod.rs"]
mod common;

#[test]
fn bindings_are_restored_after_every_block() {
    Cli::build(|root| {
        let at_root = root.bindings();
        assert_eq!(root.depth(), 0);

        root.command("outer", |outer| {
            let in_outer = outer.bindings();
            assert_eq!(outer.depth(), 1);

            outer.option("-x", |f| {
                assert_eq!(f.depth(), 2);
                assert!(matches!(f.bindings().description, Target::Flag(_)));
                f.default(1)
            })?;
            assert_eq!(outer.bindings(), in_outer);

            outer.command("inner", |inner| {
                assert_eq!(inner.depth(), 2);
                inner.flag("-y", |f| {
                    assert_eq!(f.depth(), 3);
                    Ok(())
                })?;
                common::handled(inner)
            })?;
            assert_eq!(outer.bindings(), in_outer);

            common::handled(outer)
        })?;

        assert_eq!(root.bindings(), at_root);
        assert_eq!(root.depth(), 0);
        Ok(())
    })
    .expect("tree assembles");
}

#[test]
fn a_failing_block_still_restores_the_parent_scope() {
    let err = common::build_err(|root| {
        let before = root.bindings();

        let err = root
            .command("bad", |c| {
                c.flag("-z", |f| {
                    f.description("never attached");
                    Err(BuildError::Unbound { operation: "Test" })
                })?;
                common::handled(c)
            })
            .unwrap_err();

        assert!(matches!(err, BuildError::Unbound { operation: "Test" }));
        assert_eq!(root.bindings(), before);
        assert_eq!(root.depth(), 0);
        Ok(())
    });

    assert!(matches!(err, BuildError::Unbound { operation: "Test" }));
}

#[test]
fn a_discarded_nested_error_still_fails_assembly() {
    let err = common::build_err(|root| {
        let _ = root.command("broken", |_| Ok(()));
        root.command("fine", common::handled)
    });

    assert_eq!(err.label(), Some(r#"command "broken""#));
    assert!(matches!(
        err.handler_error(),
        Some(HandlerError::MissingHandler)
    ));
}

#[test]
fn a_panicking_block_still_restores_the_parent_scope() {
    Cli::build(|root| {
        let before = root.bindings();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            root.command("boom", |c| {
                c.option("-p", |_| panic!("block exploded"))?;
                common::handled(c)
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(root.bindings(), before);
        assert_eq!(root.depth(), 0);
        Ok(())
    })
    .expect("assembly continues after the caught panic");
}

#[test]
fn operations_outside_their_scope_are_unbound() {
    let err = common::build_err(|root| root.default(9));
    assert!(matches!(err, BuildError::Unbound { operation: "Default" }));

    let err = common::build_err(|root| root.value(&cli_dsl::ValueSlot::new()));
    assert!(matches!(err, BuildError::Unbound { operation: "Value" }));

    let err = common::build_err(|root| root.required(Vec::<cli_dsl::FlagRef>::new()));
    assert!(matches!(err, BuildError::Unbound { operation: "Required" }));

    let err = common::build_err(|root| {
        root.command("start", |c| {
            c.default("nope")?;
            common::handled(c)
        })
    });
    assert!(matches!(
        err.root_cause(),
        BuildError::Unbound { operation: "Default" }
    ));
}

#[test]
fn description_targets_the_innermost_node() {
    let cli = Cli::build(|root| {
        root.description("root text");
        root.command("start", |c| {
            c.description("command text");
            c.flag("-f", |f| {
                f.description("flag text");
                Ok(())
            })?;
            common::handled(c)
        })
    })
    .expect("tree assembles");

    assert_eq!(cli.description(), "root text");
    let start = &cli.root().commands[0];
    assert_eq!(start.description, "command text");
    assert_eq!(start.flags[0].description, "flag text");
}

#[test]
fn independent_assemblies_do_not_share_bindings() {
    let first = Cli::build(|root| {
        root.name("first");
        root.command("a", common::handled)
    })
    .expect("first tree");
    let second = Cli::build(|root| {
        root.name("second");
        root.flag("-b", |_| Ok(()))?;
        Ok(())
    })
    .expect("second tree");

    assert_eq!(first.root().commands.len(), 1);
    assert!(first.root().flags.is_empty());
    assert!(second.root().commands.is_empty());
    assert_eq!(second.root().flags.len(), 1);
}
