use super::*;
use crate::pipeline::operation::Operation;
use std::path::Path;

fn ws() -> Workspace {
    Workspace::new("/ws")
}

fn run(tokens: &[&str]) -> Result<Plan> {
    parse(tokens.iter().copied(), &OperationRegistry::new(), &ws())
}

fn p(path: &str) -> PathBuf {
    PathBuf::from(path)
}

#[test]
fn test_empty_token_list_parses_to_empty_plan() {
    let plan = run(&[]).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.workspace(), Path::new("/ws"));
}

#[test]
fn test_encode_appends_suffix() {
    let plan = run(&["a.hex", "enc", "emu"]).unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(
        plan.actions[0],
        Action::new(Operation::Enc, vec![p("/ws/a.hex")], vec![p("/ws/a.hex.mem")])
    );
    // The synthesized output is what the next operation consumed
    assert_eq!(
        plan.actions[1],
        Action::new(Operation::Emu, vec![p("/ws/a.hex.mem")], vec![])
    );
}

#[test]
fn test_push_then_pop_is_noop() {
    let plan = run(&["x", "pop"]).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_dup_leaves_two_equal_entries() {
    let plan = run(&["x", "dup", "emu", "emu"]).unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(plan.actions[0].inputs, vec![p("/ws/x")]);
    assert_eq!(plan.actions[1].inputs, vec![p("/ws/x")]);
}

#[test]
fn test_dup_then_pop_leaves_original() {
    let plan = run(&["x", "dup", "pop", "pipe"]).unwrap();

    assert_eq!(
        plan.actions,
        vec![Action::new(Operation::Pipe, vec![p("/ws/x")], vec![])]
    );
}

#[test]
fn test_missing_argument_for_fixed_arity() {
    for (tokens, operation) in [
        (vec!["enc"], "enc"),
        (vec!["a.mem", "sim"], "sim"),
        (vec!["c", "m", "circ"], "circ"),
        (vec!["pop"], "pop"),
        (vec!["dup"], "dup"),
        (vec!["cat"], "cat"),
    ] {
        match run(&tokens).unwrap_err() {
            PipelineError::MissingArgument { operation: op } => assert_eq!(op, operation),
            other => panic!("Expected MissingArgument for {tokens:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_missing_argument_stops_at_first_underflow() {
    // The valid `enc` before the underflow must not matter
    let err = run(&["a.hex", "enc", "pop", "emu"]).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingArgument { ref operation } if operation == "emu"
    ));
}

#[test]
fn test_leftovers_are_all_reported() {
    let err = run(&["a.hex", "b.hex"]).unwrap_err();

    match err {
        PipelineError::UnusedArguments { leftovers } => {
            assert_eq!(leftovers, vec![p("/ws/a.hex"), p("/ws/b.hex")]);
        }
        other => panic!("Expected UnusedArguments, got {other:?}"),
    }
}

#[test]
fn test_unconsumed_output_is_a_leftover() {
    let err = run(&["a.hex", "enc"]).unwrap_err();

    match err {
        PipelineError::UnusedArguments { leftovers } => {
            assert_eq!(leftovers, vec![p("/ws/a.hex.mem")]);
        }
        other => panic!("Expected UnusedArguments, got {other:?}"),
    }
}

#[test]
fn test_cc_drains_every_pending_entry() {
    let plan = run(&["main.c", "lib.c", "util.c", "cc", "asm", "emu"]).unwrap();

    assert_eq!(
        plan.actions[0],
        Action::new(
            Operation::Cc,
            vec![p("/ws/main.c"), p("/ws/lib.c"), p("/ws/util.c")],
            vec![p("/ws/main.c.asm")]
        )
    );
    assert_eq!(plan.actions[1].inputs, vec![p("/ws/main.c.asm")]);
    assert_eq!(plan.actions[1].outputs, vec![p("/ws/main.c.asm.mem")]);
}

#[test]
fn test_cc_with_nothing_pending() {
    assert!(matches!(
        run(&["cc"]).unwrap_err(),
        PipelineError::MissingArgument { .. }
    ));
}

#[test]
fn test_mic_takes_no_inputs() {
    let plan = run(&["prog.asm", "asm", "mic", "sim"]).unwrap();

    assert_eq!(
        plan.actions[1],
        Action::new(Operation::Mic, vec![], vec![p("/ws/microcode.mic")])
    );
    // Inputs are handed over in push order
    assert_eq!(
        plan.actions[2],
        Action::new(
            Operation::Sim,
            vec![p("/ws/prog.asm.mem"), p("/ws/microcode.mic")],
            vec![]
        )
    );
}

#[test]
fn test_bf_pushes_two_outputs_in_order() {
    let plan = run(&["hello.bf", "bf", "sim"]).unwrap();

    assert_eq!(
        plan.actions[0].outputs,
        vec![p("/ws/hello.bf.mem"), p("/ws/hello.bf.mic")]
    );
    assert_eq!(
        plan.actions[1].inputs,
        vec![p("/ws/hello.bf.mem"), p("/ws/hello.bf.mic")]
    );
}

#[test]
fn test_bf_outputs_feed_circ() {
    let plan = run(&["circ/atto-8.circ", "hello.bf", "bf", "circ"]).unwrap();

    assert_eq!(
        plan.actions[1].inputs,
        vec![
            p("/ws/circ/atto-8.circ"),
            p("/ws/hello.bf.mem"),
            p("/ws/hello.bf.mic")
        ]
    );
}

#[test]
fn test_pipe_and_cat_record_sink() {
    let plan = run(&["a.mem", "dec", "pipe", "b.mem", "cat"]).unwrap();

    assert_eq!(plan.len(), 3);
    assert_eq!(plan.actions[1].operation, Operation::Pipe);
    assert_eq!(plan.actions[1].inputs, vec![p("/ws/a.mem.hex")]);
    assert_eq!(plan.actions[2].operation, Operation::Pipe);
    assert_eq!(plan.actions[2].inputs, vec![p("/ws/b.mem")]);
}

#[test]
fn test_unknown_tokens_are_filenames() {
    let plan = run(&["Enc", "emu"]).unwrap();
    assert_eq!(plan.actions[0].inputs, vec![p("/ws/Enc")]);
}

#[test]
fn test_nested_paths_resolve_against_workspace() {
    let plan = run(&["test/musts/fib.c", "cc", "pipe"]).unwrap();
    assert_eq!(plan.actions[0].inputs, vec![p("/ws/test/musts/fib.c")]);
}

#[test]
fn test_actions_follow_token_order() {
    let plan = run(&["a.asm", "asm", "dup", "dasm", "pipe", "dec", "pipe"]).unwrap();

    let order: Vec<_> = plan.actions.iter().map(|a| a.operation).collect();
    assert_eq!(
        order,
        vec![
            Operation::Asm,
            Operation::Dasm,
            Operation::Pipe,
            Operation::Dec,
            Operation::Pipe
        ]
    );
}
