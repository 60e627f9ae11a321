//! Loads a scene and writes the packed GPU textures as raw float files.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use rayprep::{PackedScene, Scene, SceneSettings, packing::TextureSlices};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const USAGE: &str = "Usage: rayprep-cli <mesh.obj> <materials.mtl> [--out DIR] [--tree] [-v]";

struct Args {
    obj: PathBuf,
    mtl: PathBuf,
    out: Option<PathBuf>,
    print_tree: bool,
    verbose: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
        let mut positional = Vec::new();
        let mut out = None;
        let mut print_tree = false;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-v" | "--verbose" => verbose = true,
                "--tree" => print_tree = true,
                "-o" | "--out" => {
                    let dir = args.next().context("--out needs a directory")?;
                    out = Some(PathBuf::from(dir));
                }
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with('-') => bail!("Unknown option {flag}\n{USAGE}"),
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let [obj, mtl]: [PathBuf; 2] = positional.try_into().map_err(|_| anyhow::anyhow!(USAGE))?;

        Ok(Args {
            obj,
            mtl,
            out,
            print_tree,
            verbose,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse(env::args().skip(1))?;

    let directive = if args.verbose {
        "rayprep=debug"
    } else {
        "rayprep=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let mut scene = Scene::with_files(&args.obj, &args.mtl, &SceneSettings::default())
        .with_context(|| format!("Loading {}", args.obj.display()))?;

    for object in &scene.objects {
        tracing::info!(
            object = %object.name,
            faces = object.faces.len(),
            "BVH statistics:\n{}",
            object.bvh.statistics()
        );
        if args.print_tree {
            println!("{}:", object.name);
            object.bvh.print_tree();
        }
    }

    let Some(out) = args.out else {
        return Ok(());
    };

    let packed = PackedScene::new(&scene);
    fs::create_dir_all(&out).with_context(|| format!("Creating {}", out.display()))?;
    write_texture(&out.join("faces.f32"), &packed.faces)?;
    write_texture(&out.join("bvh.f32"), &packed.bvh)?;
    write_texture(&out.join("materials.f32"), &packed.materials)?;

    let camera = scene.camera_matrix().to_row_major();
    let path = out.join("camera.f32");
    fs::write(&path, bytemuck::cast_slice::<f32, u8>(&camera))
        .with_context(|| format!("Writing {}", path.display()))?;

    tracing::info!(out = %out.display(), "Wrote textures");
    Ok(())
}

fn write_texture(path: &Path, texture: &TextureSlices) -> anyhow::Result<()> {
    fs::write(path, texture.as_bytes()).with_context(|| format!("Writing {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        rows = texture.rows,
        layers = texture.layers,
        texels_per_record = texture.texels_per_record,
        channels = texture.channels,
        "Wrote texture"
    );
    Ok(())
}
