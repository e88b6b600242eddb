//! Runs the real ffprobe/ffmpeg binaries. Skipped when they are not on PATH.

use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tubely_core::GeometryClass;
use tubely_processing::{
    classify_artifact, normalize_faststart, stage_upload, FfmpegToolClient, IngestPolicy,
    MediaToolClient,
};

fn tools_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|bin| {
        Command::new(bin)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

fn render_sample(path: &Path, size: &str) -> bool {
    Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=size={}:rate=10", size))
        .args(["-t", "1", "-c:v", "mpeg4", "-f", "mp4"])
        .arg(path)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_faststart_preserves_streams() {
    if !tools_available() {
        eprintln!("ffmpeg/ffprobe not found, skipping");
        return;
    }

    let source_dir = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let sample = source_dir.path().join("sample.mp4");
    if !render_sample(&sample, "320x180") {
        eprintln!("could not render sample video, skipping");
        return;
    }

    let client = FfmpegToolClient::new(
        "ffmpeg".to_string(),
        "ffprobe".to_string(),
        2,
        Duration::from_secs(60),
    )
    .unwrap();
    let policy = IngestPolicy {
        allowed_content_types: vec!["video/mp4".to_string()],
        max_bytes: 64 * 1024 * 1024,
        scratch_dir: scratch.path().to_path_buf(),
    };

    let file = tokio::fs::File::open(&sample).await.unwrap();
    let staged = stage_upload(file, "video/mp4", &policy).await.unwrap();

    let geometry = classify_artifact(&client, &staged).await.unwrap();
    assert_eq!(geometry.class, GeometryClass::Landscape);

    let normalized = normalize_faststart(&client, &staged, scratch.path())
        .await
        .unwrap();
    assert!(normalized.len() > 0);

    let before = client.probe(staged.path()).await.unwrap();
    let after = client.probe(normalized.path()).await.unwrap();
    assert_eq!(before.streams.len(), after.streams.len());
    let (b, a) = (
        before.first_video_stream().unwrap(),
        after.first_video_stream().unwrap(),
    );
    assert_eq!((b.width, b.height), (a.width, a.height));

    drop(staged);
    drop(normalized);
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_probe_rejects_non_media() {
    if !tools_available() {
        eprintln!("ffmpeg/ffprobe not found, skipping");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.mp4");
    std::fs::write(&bogus, b"this is not a video").unwrap();

    let client = FfmpegToolClient::new(
        "ffmpeg".to_string(),
        "ffprobe".to_string(),
        1,
        Duration::from_secs(30),
    )
    .unwrap();

    assert!(client.probe(&bogus).await.is_err());
}
