//! Binary tensor serialization
//!
//! Encoded vectors are handed to the external model consumers as a single
//! binary file: an 8-byte header of two little-endian `u32` values
//! (`[num_entries, dims_per_entry]`) followed by `num_entries *
//! dims_per_entry` little-endian IEEE-754 `f32` values in row-major order.
//!
//! A file may optionally be compressed as a whole (zlib deflate over
//! header and payload together); compressed files carry the distinct
//! `.datz` extension so consumers never have to sniff.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::{Compression, write::ZlibEncoder};

/// Extension of uncompressed tensor files.
pub const TENSOR_EXT: &str = "dat";
/// Extension of zlib-compressed tensor files.
pub const TENSOR_COMPRESSED_EXT: &str = "datz";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TensorError {
    #[display("failed to write tensor {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
}

/// Writes the header and rows to an arbitrary sink.
///
/// # Panics
///
/// Panics if the rows are ragged (every row must have identical length;
/// the format has a single `dims_per_entry`) or if either dimension
/// exceeds `u32::MAX`. Both are caller preconditions, not recoverable
/// conditions.
pub fn write_tensor<W>(writer: &mut W, rows: &[Vec<f32>]) -> io::Result<()>
where
    W: Write,
{
    let dims = rows.first().map_or(0, Vec::len);
    assert!(
        rows.iter().all(|row| row.len() == dims),
        "tensor rows must all have length {dims}"
    );
    let num_entries =
        u32::try_from(rows.len()).expect("tensor entry count must fit in a u32 header field");
    let dims_per_entry =
        u32::try_from(dims).expect("tensor dimension count must fit in a u32 header field");

    writer.write_all(&num_entries.to_le_bytes())?;
    writer.write_all(&dims_per_entry.to_le_bytes())?;
    for row in rows {
        for value in row {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Writes a tensor file next to `base_path`, appending the extension that
/// matches the compression choice, and returns the final path.
pub fn write_tensor_file<P>(
    base_path: P,
    rows: &[Vec<f32>],
    compress: bool,
) -> Result<PathBuf, TensorError>
where
    P: AsRef<Path>,
{
    let ext = if compress {
        TENSOR_COMPRESSED_EXT
    } else {
        TENSOR_EXT
    };
    let path = base_path.as_ref().with_extension(ext);
    let write = |path: &Path| -> io::Result<()> {
        let file = BufWriter::new(File::create(path)?);
        if compress {
            let mut encoder = ZlibEncoder::new(file, Compression::default());
            write_tensor(&mut encoder, rows)?;
            encoder.finish()?.flush()
        } else {
            let mut file = file;
            write_tensor(&mut file, rows)?;
            file.flush()
        }
    };
    write(&path).map_err(|source| TensorError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::ZlibDecoder;

    use super::*;

    #[test]
    fn header_and_rows_serialize_little_endian() {
        // 2 entities of dimension 3: header (2, 3) then 6 LE f32 values.
        let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 1.0]];
        let mut bytes = Vec::new();
        write_tensor(&mut bytes, &rows).unwrap();

        assert_eq!(bytes.len(), 8 + 6 * 4);
        assert_eq!(&bytes[0..4], &2_u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &3_u32.to_le_bytes());
        let floats: Vec<f32> = bytes[8..]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats, vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_tensor_is_header_only() {
        let mut bytes = Vec::new();
        write_tensor(&mut bytes, &[]).unwrap();
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "tensor rows must all have length")]
    fn ragged_rows_violate_the_precondition() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let mut bytes = Vec::new();
        let _ = write_tensor(&mut bytes, &rows);
    }

    #[test]
    fn compressed_stream_decodes_to_the_plain_bytes() {
        let rows = vec![vec![0.5, 1.5], vec![2.5, 3.5], vec![4.5, 5.5]];
        let mut plain = Vec::new();
        write_tensor(&mut plain, &rows).unwrap();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        write_tensor(&mut encoder, &rows).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut decoded = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, plain);
    }

    #[test]
    fn file_writer_picks_the_extension_for_the_compression_choice() {
        let dir = std::env::temp_dir().join(format!("valar-tensor-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let rows = vec![vec![1.0_f32]];

        let plain = write_tensor_file(dir.join("labels-train"), &rows, false).unwrap();
        assert_eq!(plain.extension().unwrap(), TENSOR_EXT);
        let packed = write_tensor_file(dir.join("labels-train"), &rows, true).unwrap();
        assert_eq!(packed.extension().unwrap(), TENSOR_COMPRESSED_EXT);

        std::fs::remove_dir_all(&dir).ok();
    }
}
