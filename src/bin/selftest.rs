use std::fmt::Debug;

use clap::Parser;
use linked_list::{LinkedList, ListError};
use tracing_subscriber::EnvFilter;

/// Runs the documented linked list usage examples and reports each one.
#[derive(Parser, Debug)]
#[command(about = "Check the linked list against its usage examples")]
struct CmdOptions {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
    /// Only run examples whose name contains this text
    #[arg(long)]
    filter: Option<String>,
    /// Only print failures and the summary
    #[arg(short, long)]
    quiet: bool,
}

type Outcome = Result<(), String>;

struct Example {
    name: &'static str,
    run: fn() -> Outcome,
}

fn check<A: Debug + PartialEq>(actual: A, expected: A) -> Outcome {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {:?}, got {:?}", expected, actual))
    }
}

fn examples() -> Vec<Example> {
    vec![
        Example {
            name: "empty list",
            run: || {
                let ll: LinkedList<char> = LinkedList::new();
                check(format!("{:?}", ll), "LinkedList([])".to_string())?;
                check(ll.head().is_none(), true)?;
                check(ll.len(), 0)
            },
        },
        Example {
            name: "list from string",
            run: || {
                let ll: LinkedList<char> = "hello".chars().collect();
                check(
                    format!("{:?}", ll),
                    "LinkedList(['h', 'e', 'l', 'l', 'o'])".to_string(),
                )?;
                let head = ll.head().ok_or("missing head")?;
                check(format!("{:?}", head), "Node('h', <\"link\">)".to_string())?;
                check(ll.len(), 5)
            },
        },
        Example {
            name: "push then pop",
            run: || {
                let mut ll = LinkedList::from([1, 2, 3]);
                ll.push(0);
                check(ll.pop(), Ok(0))?;
                check(ll, LinkedList::from([1, 2, 3]))
            },
        },
        Example {
            name: "pop from empty list",
            run: || {
                let mut ll: LinkedList<i32> = LinkedList::new();
                check(ll.pop(), Err(ListError::OutOfRange { op: "pop" }))
            },
        },
        Example {
            name: "index past the end",
            run: || {
                let ll = LinkedList::from([1, 2, 3]);
                check(ll.get(2), Ok(&3))?;
                check(ll.get(3), Err(ListError::OutOfRange { op: "index" }))
            },
        },
        Example {
            name: "index with a string",
            run: || {
                let ll = LinkedList::from([1, 2, 3]);
                match ll.subscript("a") {
                    Err(ListError::InvalidIndexType { type_name }) => {
                        check(type_name.as_str(), "&str")
                    }
                    other => Err(format!("expected a type error, got {:?}", other)),
                }
            },
        },
        Example {
            name: "search",
            run: || {
                let ll = LinkedList::from([5, 3, 5, 1]);
                check(ll.index_of(&5, 0, None), Ok(0))?;
                check(
                    ll.index_of(&9, 0, None),
                    Err(ListError::ValueNotFound {
                        value: "9".to_string(),
                    }),
                )
            },
        },
        Example {
            name: "stepped range",
            run: || {
                let ll: LinkedList<i32> = (0..6).collect();
                let picked: Vec<i32> = ll.get_range(Some(1), Some(5), Some(2)).copied().collect();
                check(picked, vec![1, 3])
            },
        },
        Example {
            name: "emptiness",
            run: || {
                check(LinkedList::<i32>::new().is_empty(), true)?;
                check(LinkedList::from([1]).is_empty(), false)
            },
        },
        Example {
            name: "display",
            run: || {
                let ll = LinkedList::from([1, 2, 3]);
                check(format!("{:?}", ll), "LinkedList([1, 2, 3])".to_string())
            },
        },
    ]
}

/// Runs the selected examples, returning how many passed and failed.
fn run_examples(options: &CmdOptions) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;
    let selected = examples().into_iter().filter(|example| {
        options
            .filter
            .as_deref()
            .map_or(true, |filter| example.name.contains(filter))
    });
    for example in selected {
        match (example.run)() {
            Ok(()) => {
                passed += 1;
                if !options.quiet {
                    println!("PASS {}", example.name);
                }
            }
            Err(reason) => {
                failed += 1;
                tracing::error!(example = example.name, %reason, "example failed");
                println!("FAIL {}: {}", example.name, reason);
            }
        }
    }
    (passed, failed)
}

fn main() {
    let options = CmdOptions::parse();

    let default_level = if options.verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let (passed, failed) = run_examples(&options);
    println!("{} passed, {} failed", passed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}
