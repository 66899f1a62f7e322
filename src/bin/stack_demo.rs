//! # Stack Demo
//!
//! Demonstrates:
//! - Loading an effect configuration from RON
//! - Laying out text with the built-in monospace layout
//! - Bending the text along a curve and building the combined stacked mesh
//!
//! Run with:
//!   cargo run --bin stack_demo -- --text "HELLO" --stacks 4 --bend
//!   cargo run --bin stack_demo -- --print-default-config > effect.ron
//!   cargo run --bin stack_demo -- --config effect.ron

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use text_stack::mesh::LayerKind;
use text_stack::stack::MAX_STACK_COUNT;
use text_stack::{
    EffectConfig, GlyphLayout, ShapedText, StackConfig, StackVertex, StackedTextEffect,
    UpdateOutcome,
};

#[derive(Parser, Debug)]
#[command(
    name = "stack_demo",
    about = "Build a stacked text mesh and print its layer breakdown",
    version
)]
struct Args {
    /// Text to lay out.
    #[arg(long, default_value = "STACKED")]
    text: String,

    /// RON effect configuration to load.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the default configuration as RON and exit.
    #[arg(long)]
    print_default_config: bool,

    /// Enable curve bending regardless of the configuration.
    #[arg(long)]
    bend: bool,

    /// Replace the configured stacks with a single stack of N sub-layers.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_STACK_COUNT as i64))]
    stacks: Option<u32>,
}

fn default_config() -> EffectConfig {
    EffectConfig {
        stacks: vec![StackConfig {
            stack_count: 3,
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.print_default_config {
        return match default_config().to_ron_string() {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(err) => {
                log::error!("{}", err);
                ExitCode::FAILURE
            }
        };
    }

    let mut config = match &args.config {
        Some(path) => match EffectConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => default_config(),
    };
    if args.bend {
        config.curve.enabled = true;
    }

    let mut effect = StackedTextEffect::new(config);
    if let Some(count) = args.stacks {
        effect.set_stacks(vec![StackConfig {
            stack_count: count,
            ..Default::default()
        }]);
    }

    let layout = GlyphLayout::default().layout(&args.text);
    let shaped = ShapedText {
        text: &args.text,
        mesh: &layout.mesh,
        characters: &layout.characters,
        world_scale: Vec3::ONE,
    };

    match effect.update(&shaped) {
        UpdateOutcome::Rebuilt | UpdateOutcome::Unchanged => {}
        UpdateOutcome::Skipped(err) => {
            log::warn!("No mesh built: {}", err);
            return ExitCode::FAILURE;
        }
    }

    let Some(mesh) = effect.mesh() else {
        return ExitCode::FAILURE;
    };

    log::info!(
        "{} glyph vertices -> {} layers, {} vertices, {} triangles",
        layout.mesh.vertex_count(),
        mesh.layers().len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    for (i, layer) in mesh.layers().iter().enumerate() {
        match layer.kind {
            LayerKind::Stack {
                config,
                sub_layer,
                t,
            } => println!(
                "layer {:>2}: stack {} sub-layer {} t={:.2} offset=({:.2}, {:.2}) edge={:?}",
                i,
                config,
                sub_layer,
                t,
                layer.offset.x,
                layer.offset.y,
                mesh.uv3()[layer.first_vertex]
            ),
            LayerKind::Main => println!(
                "layer {:>2}: main edge={:?}",
                i,
                mesh.uv3()[layer.first_vertex]
            ),
        }
    }

    let mut vertices = Vec::new();
    mesh.write_vertices(&mut vertices);
    println!(
        "vertex buffer: {} bytes (stride {}), index buffer: {} bytes",
        bytemuck::cast_slice::<StackVertex, u8>(&vertices).len(),
        StackVertex::layout().array_stride,
        mesh.index_bytes().len()
    );

    ExitCode::SUCCESS
}
