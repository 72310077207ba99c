// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dialogue Graph CLI entrypoint.
//!
//! Inspects saved dialogue graphs and their compiled assets, or writes a demo graph into a
//! store. Log output goes to stderr and is filtered through `DIALOGUE_GRAPH_LOG` (default
//! `warn`).

use std::error::Error;

use dialogue_graph::model::DialogueNode;
use dialogue_graph::query;
use dialogue_graph::session::{demo_session, EditorSession};
use dialogue_graph::store::{AssetStore, CompiledAsset, RecordRef, WriteDurability};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DIALOGUE_GRAPH_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--store <dir>] [--durable-writes] inspect <file-name>\n  {program} [--store <dir>] [--durable-writes] compiled <file-name>\n  {program} [--store <dir>] [--durable-writes] demo <file-name>\n\ninspect   loads a saved graph and lists its groups, dialogues and name errors.\ncompiled  lists the compiled dialogues per group; `*` marks starting dialogues.\ndemo      writes a small branching demo graph under <file-name>.\n\nIf --store is omitted, the current working directory is used.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\nSet {LOG_ENV} (e.g. `info`, `dialogue_graph=debug`) to see log output."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Inspect { file_name: String },
    Compiled { file_name: String },
    Demo { file_name: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    store_dir: Option<String>,
    durable_writes: bool,
    command: Option<Command>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.store_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.command.is_some() {
                    return Err(());
                }
                let file_name = args.next().ok_or(())?;
                options.command = Some(match arg.as_str() {
                    "inspect" => Command::Inspect { file_name },
                    "compiled" => Command::Compiled { file_name },
                    "demo" => Command::Demo { file_name },
                    _ => return Err(()),
                });
            }
        }
    }

    if options.command.is_none() {
        return Err(());
    }

    Ok(options)
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn describe_node(session: &EditorSession, node: &DialogueNode) -> String {
    let model = session.model();
    let targets = node
        .choices()
        .iter()
        .map(|choice| {
            let target = choice
                .target_node_id()
                .and_then(|target| model.graph().node(target))
                .map_or("-", |target| target.name());
            format!("{:?} -> {target}", choice.text())
        })
        .collect::<Vec<_>>()
        .join(", ");
    let marker = if model.is_starting_node(node.node_id()) {
        "*"
    } else {
        " "
    };
    format!("{marker} {} ({}) [{targets}]", node.name(), node.kind())
}

fn print_inspect(session: &EditorSession) {
    let model = session.model();
    let graph = model.graph();
    println!(
        "{}: {} dialogue(s), {} group(s)",
        session.file_name(),
        graph.nodes().len(),
        graph.groups().len()
    );

    for group in graph.groups().values() {
        println!("group {}", group.name());
        for node_id in graph.group_members(group.group_id()) {
            if let Some(node) = graph.node(node_id) {
                println!("  {}", describe_node(session, node));
            }
        }
    }
    println!("ungrouped");
    for node in graph.nodes().values().filter(|node| node.group_id().is_none()) {
        println!("  {}", describe_node(session, node));
    }

    let unreachable = query::graph::unreachable(graph);
    if !unreachable.is_empty() {
        let names = unreachable
            .iter()
            .filter_map(|node_id| graph.node(node_id))
            .map(DialogueNode::name)
            .collect::<Vec<_>>();
        println!("unreachable: {}", names.join(", "));
    }

    println!("name errors: {}", model.name_errors());
    for collision in model.names().collisions() {
        println!("  {:?} is used {} times", collision.name_key, collision.entities.len());
    }
}

fn print_compiled(asset: &CompiledAsset) {
    let starting = |record_ref: &RecordRef| {
        asset.record(record_ref).is_some_and(|record| record.is_starting_dialogue)
    };

    println!("{}", asset.container().file_name);
    for group_name in query::compiled::group_names(asset) {
        println!("group {group_name}");
        for name in query::compiled::grouped_dialogue_names(asset, group_name, false) {
            let marker = if starting(&RecordRef::grouped(group_name, name)) { "*" } else { " " };
            println!("  {marker} {name}");
        }
    }
    println!("ungrouped");
    for name in query::compiled::ungrouped_dialogue_names(asset, false) {
        let marker = if starting(&RecordRef::ungrouped(name)) { "*" } else { " " };
        println!("  {marker} {name}");
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "dialogue-graph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging();

        let dir = options.store_dir.unwrap_or_else(|| ".".to_owned());
        let store = if options.durable_writes {
            AssetStore::new(dir).with_durability(WriteDurability::Durable)
        } else {
            AssetStore::new(dir)
        };

        match options.command {
            Some(Command::Inspect { file_name }) => {
                let mut session = EditorSession::new(store);
                session.load(&file_name)?;
                print_inspect(&session);
            }
            Some(Command::Compiled { file_name }) => {
                let asset = store.load_compiled(&file_name)?;
                print_compiled(&asset);
            }
            Some(Command::Demo { file_name }) => {
                let mut session = demo_session(store)?;
                let report = session.save(&file_name)?;
                println!(
                    "saved {}: {} created, {} updated, {} unchanged, {} removed",
                    report.file_name,
                    report.created.len(),
                    report.updated.len(),
                    report.unchanged.len(),
                    report.removed.len()
                );
            }
            None => {}
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("dialogue-graph: {err}");
        std::process::exit(1);
    }
}
