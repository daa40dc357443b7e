// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only consumers of a pipeline result: saving the final skeleton and
// dumping every stage to disk for inspection.

use std::path::{Path, PathBuf};

use sigprep_core::error::{Result, SigprepError};
use sigprep_pipeline::{PipelineResult, save_gray};
use tracing::{debug, info};

/// Write the canonical skeleton.
pub fn save_final(result: &PipelineResult, path: &Path) -> Result<()> {
    save_gray(&result.final_image, path)?;
    info!(path = %path.display(), "Saved final normalized skeleton");
    Ok(())
}

/// Write the original and every intermediate raster into `dir` as
/// `00_original.png`, `01_gray.png`, ... in pipeline order.
pub fn dump_stages(result: &PipelineResult, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|err| {
        SigprepError::Encode(format!("cannot create {}: {}", dir.display(), err))
    })?;

    let original = dir.join("00_original.png");
    result.original.save(&original).map_err(|err| {
        SigprepError::Encode(format!("failed to save {}: {}", original.display(), err))
    })?;
    let mut written = vec![original];

    for (index, (name, raster)) in result.stages().into_iter().enumerate() {
        let path = dir.join(format!("{:02}_{}.png", index + 1, name));
        save_gray(raster, &path)?;
        debug!(stage = name, path = %path.display(), "Stage written");
        written.push(path);
    }

    info!(dir = %dir.display(), count = written.len(), "Stages dumped");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ExitCode;
    use image::{DynamicImage, GrayImage, Luma};
    use sigprep_pipeline::{PipelineConfig, preprocess};

    fn sample_result() -> PipelineResult {
        let mut img = GrayImage::from_pixel(300, 100, Luma([255u8]));
        for y in 45..55 {
            for x in 50..250 {
                img.put_pixel(x, y, Luma([10u8]));
            }
        }
        preprocess(&DynamicImage::ImageLuma8(img), PipelineConfig::default()).unwrap()
    }

    #[test]
    fn every_stage_is_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let result = sample_result();
        let written = dump_stages(&result, dir.path()).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("00_original.png"));
        assert_eq!(names.last().map(String::as_str), Some("07_final.png"));
        assert_eq!(names.len(), 8);
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn final_skeleton_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final_signature.png");
        let result = sample_result();
        save_final(&result, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(loaded, result.final_image);
    }

    #[test]
    fn unusable_stage_directory_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = dump_stages(&sample_result(), &blocker.join("stages")).unwrap_err();
        assert!(matches!(err, SigprepError::Encode(_)), "{err:?}");
        assert_eq!(ExitCode::for_error(&err), ExitCode::OutputError);
    }

    #[test]
    fn unknown_extension_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_final(&sample_result(), &dir.path().join("final.unknownext")).unwrap_err();
        assert!(matches!(err, SigprepError::Encode(_)));
    }
}
