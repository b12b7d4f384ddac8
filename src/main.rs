use anyhow::Context;
use pipegraph::graph::{props, EdgeRecord, GraphStore, VertexRecord};
use pipegraph::{DbConfig, PersistenceManager, QueryEngine, Value};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DbConfig::from_file(&path).with_context(|| format!("loading config from {}", path))?,
        None => DbConfig::default(),
    };

    println!("Pipegraph v{}", pipegraph::version());
    println!("==========================================");

    let graph = family_graph();
    println!("\nGraph: {} vertices, {} edges", graph.vertex_count(), graph.edge_count());

    let engine = QueryEngine::with_config(&config).with_kinship_aliases()?;
    demo_traversals(&engine, &graph);
    demo_persistence(&config, &graph)?;

    Ok(())
}

/// Three generations; `parent` edges point from child to parent
fn family_graph() -> GraphStore {
    let person = |id: u64, name: &str| VertexRecord::with_id(id).property("name", name);
    GraphStore::from_records(
        vec![
            person(1, "Thor"),
            person(2, "Frigg"),
            person(3, "Odin"),
            person(4, "Baldr"),
            person(5, "Hodr"),
            person(6, "Forseti"),
            person(7, "Magni"),
        ],
        vec![
            EdgeRecord::new(4, 3, "parent"),
            EdgeRecord::new(4, 2, "parent"),
            EdgeRecord::new(5, 3, "parent"),
            EdgeRecord::new(5, 2, "parent"),
            EdgeRecord::new(1, 3, "parent"),
            EdgeRecord::new(6, 4, "parent"),
            EdgeRecord::new(7, 1, "parent"),
        ],
    )
}

fn names(values: &[Value]) -> String {
    values
        .iter()
        .filter_map(|v| v.as_property().and_then(|p| p.as_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn demo_traversals(engine: &QueryEngine, graph: &GraphStore) {
    println!("\n=== Traversals ===");
    let baldr = || props([("name", "Baldr".into())]);

    let parents = engine.v(graph, baldr()).step("parents", Vec::new()).property("name").run();
    println!("Baldr's parents: {}", names(&parents));

    let siblings = engine
        .v(graph, baldr())
        .step("siblings", Vec::new())
        .unique()
        .property("name")
        .run();
    println!("Baldr's siblings: {}", names(&siblings));

    let cousins = engine.v(graph, 6).step("cousins", Vec::new()).property("name").run();
    println!("Forseti's cousins: {}", names(&cousins));

    let grandchildren = engine
        .v(graph, 3)
        .in_("parent")
        .in_("parent")
        .property("name")
        .take(1)
        .run();
    println!("First of Odin's grandchildren: {}", names(&grandchildren));
}

fn demo_persistence(config: &DbConfig, graph: &GraphStore) -> anyhow::Result<()> {
    println!("\n=== Persistence ===");
    let restored = if config.data_path.is_some() {
        let manager = PersistenceManager::open_rocksdb(config)?;
        manager.persist(graph, None)?;
        manager.depersist(None)?
    } else {
        let manager = PersistenceManager::in_memory(config);
        manager.persist(graph, None)?;
        manager.depersist(None)?
    };

    let restored = restored.context("snapshot missing right after persisting")?;
    println!(
        "Restored {} vertices and {} edges from {}::{}",
        restored.vertex_count(),
        restored.edge_count(),
        config.namespace,
        config.default_graph
    );
    Ok(())
}
