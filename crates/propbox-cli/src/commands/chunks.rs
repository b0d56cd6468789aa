use crate::output::{ChunkReport, print_chunk, print_structured};
use crate::{CacheLocation, ChunkCommands, OutputFormat};
use anyhow::Context;
use propbox_cache::ChunkCache;
use propbox_formats::{Prop, pack_props};
use std::path::Path;
use tracing::{debug, info};

pub async fn handle(
    cmd: ChunkCommands,
    location: &CacheLocation,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = location.resolve()?;
    debug!("Using chunk store at {:?}", config.store_path());
    let cache = ChunkCache::open(config)
        .await
        .context("failed to open chunk cache")?;

    match cmd {
        ChunkCommands::Coords { world } => {
            let coords = cache.available_coordinates(world).await?;
            if !print_structured(&coords, format)? {
                for position in &coords {
                    println!("{} {}", position.x, position.z);
                }
                info!("{} chunks cached for world {}", coords.len(), world);
            }
        }
        ChunkCommands::Show { world, x, z } => match cache.get(world, x, z).await? {
            Some(chunk) => print_chunk(
                &ChunkReport {
                    hash: chunk.hash,
                    props: &chunk.props,
                },
                format,
            )?,
            None => {
                if !print_structured(&serde_json::Value::Null, format)? {
                    println!("Chunk {world}:{x}:{z} is not cached");
                }
            }
        },
        ChunkCommands::Import {
            world,
            x,
            z,
            file,
            packed,
        } => {
            if packed {
                let data = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("failed to read {}", file.display()))?;
                cache.put_packed(world, x, z, &data).await?;
            } else {
                let props = read_props_json(&file).await?;
                cache.put(world, x, z, &props).await?;
            }
            println!("Stored chunk {world}:{x}:{z}");
        }
        ChunkCommands::Export { world, x, z, file } => {
            let chunk = cache
                .get(world, x, z)
                .await?
                .with_context(|| format!("chunk {world}:{x}:{z} is not cached"))?;
            let data = pack_props(&chunk.props)?;
            tokio::fs::write(&file, &data)
                .await
                .with_context(|| format!("failed to write {}", file.display()))?;
            println!(
                "Wrote {} props ({} bytes) to {}",
                chunk.props.len(),
                data.len(),
                file.display()
            );
        }
        ChunkCommands::Delete { world, x, z } => {
            if cache.delete(world, x, z).await? {
                println!("Deleted chunk {world}:{x}:{z}");
            } else {
                println!("Chunk {world}:{x}:{z} was not cached");
            }
        }
        ChunkCommands::Wipe { world } => {
            let removed = cache.wipe_world(world).await?;
            println!("Removed {removed} chunks from world {world}");
        }
        ChunkCommands::Clear => {
            let removed = cache.clear().await?;
            println!("Removed {removed} chunks");
        }
    }

    Ok(())
}

/// Read a JSON array of props
pub async fn read_props_json(path: &Path) -> anyhow::Result<Vec<Prop>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of props", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_read_props_json_defaults_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props.json");
        std::fs::write(
            &path,
            r#"[{
                "id": 1, "world_id": 2, "user_id": 3, "date": 4,
                "x": 0.5, "y": 0.0, "z": -0.5,
                "yaw": 0.0, "pitch": 0.0, "roll": 0.0,
                "name": "lamp"
            }]"#,
        )
        .unwrap();

        let props = read_props_json(&path).await.unwrap();
        assert_eq!(
            props,
            vec![Prop::new(1, 2, 3, 4, "lamp").with_position(0.5, 0.0, -0.5)]
        );
    }

    #[tokio::test]
    async fn test_import_then_export() {
        let dir = tempfile::tempdir().unwrap();
        let location = CacheLocation {
            config: None,
            cache_dir: Some(dir.path().join("cache")),
            store: None,
        };

        let input = dir.path().join("props.json");
        std::fs::write(&input, r#"[{"id":9,"world_id":1,"user_id":1,"date":5,"x":0,"y":0,"z":0,"yaw":0,"pitch":0,"roll":0,"name":"tree","action":"create sign"}]"#).unwrap();
        handle(
            ChunkCommands::Import {
                world: 1,
                x: -2,
                z: 3,
                file: input,
                packed: false,
            },
            &location,
            OutputFormat::Text,
        )
        .await
        .unwrap();

        let output = dir.path().join("chunk.pack");
        handle(
            ChunkCommands::Export {
                world: 1,
                x: -2,
                z: 3,
                file: output.clone(),
            },
            &location,
            OutputFormat::Text,
        )
        .await
        .unwrap();

        let props = propbox_formats::unpack_props(&std::fs::read(output).unwrap()).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].action, "create sign");
    }

    #[tokio::test]
    async fn test_show_missing_chunk_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let location = CacheLocation {
            config: None,
            cache_dir: Some(dir.path().to_path_buf()),
            store: None,
        };

        handle(
            ChunkCommands::Show {
                world: 1,
                x: 0,
                z: 0,
            },
            &location,
            OutputFormat::Json,
        )
        .await
        .unwrap();
    }
}
