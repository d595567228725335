//! Walkthrough: build a small tree, delete its root, inspect the result.
//!
//! Run with `cargo run --example rb_tree_demo`. Raise the logger to
//! `LevelFilter::Trace` to see every rebalancing case taken.

use arena_rbtree::{DeleteError, RbTree};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn main() {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("logger installed once");

    let mut rbt = RbTree::new();

    println!("Inserting nodes: 10, 20, 30, 15, 25");
    rbt.extend([10, 20, 30, 15, 25]);

    println!("In-order traversal of the tree:");
    println!("{}", rbt);

    println!("Deleting node 20");
    if let Err(DeleteError::KeyNotFound(k)) = rbt.delete(20) {
        println!("Node {} not found in the tree!", k);
    }

    println!("In-order traversal after deletion:");
    println!("{}", rbt);

    match rbt.root() {
        Some(root) => println!("Root of the tree: {} ({:?})", root.key(), root.color()),
        None => println!("The tree is empty."),
    }
    println!("Height of the tree: {}", rbt.height());

    // Misses are reported, not fatal.
    if let Err(e) = rbt.delete(99) {
        println!("{}", e);
    }
}
