//! Scene registry demo
//!
//! This demo wires a document to a scene registry drawing through the
//! headless backend:
//! - Adding mesh and shape items
//! - Editing proxy properties
//! - Selecting faces of an assembly node
//! - Erasing items and watching the scene bounds
//!
//! Pass a JSON file of display defaults as first argument to override them.

use scenecrate_core::{Color, Point3d, PropertyOwnerExt, Triangulation};
use scenecrate_gpx::{
    ApplicationItem, DisplayDefaults, DisplayMode, Document, DocumentItem, HeadlessBackend, Material,
    MeshItem, SceneEvent, SceneRegistry, Shape, ShapeItem, ShapeProxy,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenecrate_gpx=info,scene_demo=info".into()),
        )
        .init();

    let defaults = match std::env::args().nth(1) {
        Some(path) => DisplayDefaults::load(path)?,
        None => DisplayDefaults::default(),
    };

    println!("scenecrate Scene Demo");
    println!("=====================");

    let mut document = Document::new("demo");
    let mut registry = SceneRegistry::new(&document, Box::new(HeadlessBackend::new()), defaults);
    registry.subscribe(|event| match event {
        SceneEvent::BoundsChanged(bounds) => match (bounds.min(), bounds.max()) {
            (Some(min), Some(max)) => println!("  bounds: {:?} .. {:?}", min.coords.as_slice(), max.coords.as_slice()),
            _ => println!("  bounds: void"),
        },
        SceneEvent::SelectionChanged => println!("  selection changed"),
    });

    // A block with one face exposed as an assembly node
    let mut block = ShapeItem::new(
        "block",
        Shape::cuboid(Point3d::new(0.0, 0.0, 0.0), Point3d::new(2.0, 1.0, 1.0)),
    );
    let top = block.shape().faces()[1].clone();
    let top_node = block.add_node(block.root_node(), "top face", top);
    let block_id = block.id();
    let event = document.add_item(block);
    registry.handle_document_event(&document, &event)?;

    let mesh = MeshItem::new(
        "plate",
        Triangulation::from_nodes_and_triangles(
            vec![
                Point3d::new(3.0, 0.0, 0.0),
                Point3d::new(5.0, 0.0, 0.0),
                Point3d::new(5.0, 2.0, 0.0),
                Point3d::new(3.0, 2.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        ),
    );
    let mesh_id = mesh.id();
    let event = document.add_item(mesh);
    registry.handle_document_event(&document, &event)?;
    println!("\nDisplayed {} items", registry.entry_count());

    // Edit the block's appearance through its proxy
    if let Some(proxy) = registry.find_proxy_mut(block_id) {
        if let Some(shape_proxy) = proxy.as_any().downcast_ref::<ShapeProxy>() {
            let (color, material, transparency) =
                (shape_proxy.color, shape_proxy.material, shape_proxy.transparency);
            proxy.set_value(color, Color::from_rgb8([200, 60, 40]))?;
            proxy.set_value(material, Material::Bronze)?;
            proxy.set_value(transparency, 30)?;
        }
    }
    registry.set_display_mode(mesh_id, DisplayMode::Wireframe)?;
    info!("Mesh display mode: {:?}", registry.display_mode(mesh_id));

    if let Some(node) = top_node {
        println!("\nSelecting the top face");
        registry.toggle_selection(&ApplicationItem::AssemblyNode {
            document: &document,
            item: block_id,
            node,
        });
    }
    println!("Selecting the whole document");
    registry.toggle_selection(&ApplicationItem::Document(&document));
    println!("{} owners selected", registry.selection().len());
    registry.clear_selection();

    println!("\nErasing the block");
    if let Some(event) = document.erase_item(block_id) {
        registry.handle_document_event(&document, &event)?;
    }
    registry.update_viewer();

    if let Some(backend) = registry.backend::<HeadlessBackend>() {
        println!(
            "\nBackend: {} representations created, {} displayed, {} viewer updates, {} fits",
            backend.created_count(),
            backend.displayed().len(),
            backend.viewer_updates(),
            backend.fit_all_count()
        );
    }

    println!("\nDefaults in effect:\n{}", registry.defaults().to_json_string()?);
    Ok(())
}
