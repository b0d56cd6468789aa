use crate::OutputFormat;
use crate::output::{ChunkReport, print_chunk};
use anyhow::{Context, bail};
use propbox_formats::pack::{PACK_HEADER_SIZE, PackReader};
use propbox_formats::prop::record_len;
use propbox_formats::{Prop, hash_props};
use std::path::Path;
use tracing::debug;

/// Decode a prop pack, or a single prop record, from a file and print it.
pub async fn handle(file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let props = decode(&data).with_context(|| format!("{} is not a prop pack", file.display()))?;

    print_chunk(
        &ChunkReport {
            hash: hash_props(&props),
            props: &props,
        },
        format,
    )
}

fn decode(data: &[u8]) -> anyhow::Result<Vec<Prop>> {
    match decode_pack(data) {
        Ok(props) => Ok(props),
        Err(pack_err) => {
            // A lone record is also accepted
            debug!("Not a pack ({pack_err}), trying a single record");
            decode_record(data).map_err(|_| pack_err)
        }
    }
}

/// Decode `data` as exactly one record.
fn decode_record(data: &[u8]) -> anyhow::Result<Vec<Prop>> {
    let len = record_len(data)?;
    if len != data.len() {
        bail!("record is {len} bytes but the file holds {}", data.len());
    }
    Ok(vec![Prop::deserialize(data)?])
}

/// Decode `data` as a pack that spans the whole buffer.
fn decode_pack(data: &[u8]) -> anyhow::Result<Vec<Prop>> {
    let reader = PackReader::new(data)?;
    debug!("Pack declares {} records", reader.entry_count());

    let mut props = Vec::with_capacity(reader.entry_count() as usize);
    let mut end = PACK_HEADER_SIZE;
    for record in reader.records() {
        let record = record?;
        props.push(Prop::deserialize(record.bytes)?);
        end = record.next_offset;
    }

    if end != data.len() {
        bail!("{} bytes follow the last pack record", data.len() - end);
    }
    Ok(props)
}
