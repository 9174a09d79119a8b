// src/replay.rs
//
// Reads recorded tracker output (JSON lines, one frame per line) and hands
// frames to the monitor the way the live camera loop would: every Nth frame,
// with low-confidence detections already dropped.

use crate::types::{ReplayConfig, TrackerFrame};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const FEED_EXTENSIONS: [&str; 2] = ["jsonl", "ndjson"];

pub struct ReplaySource {
    config: ReplayConfig,
}

impl ReplaySource {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn find_feeds(&self) -> Result<Vec<PathBuf>> {
        let mut feeds = Vec::new();

        for entry in WalkDir::new(&self.config.input_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_feed = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FEED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_feed && entry.file_type().is_file() {
                feeds.push(path.to_path_buf());
            }
        }

        info!("Found {} tracker feed(s)", feeds.len());
        Ok(feeds)
    }

    pub fn open_feed(&self, path: &Path) -> Result<FeedReader<BufReader<File>>> {
        info!("Opening tracker feed: {}", path.display());
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(FeedReader::new(
            BufReader::new(file),
            path.display().to_string(),
            &self.config,
        ))
    }
}

pub struct FeedReader<R: BufRead> {
    reader: R,
    name: String,
    line_no: usize,
    frames_read: u64,
    frame_stride: u64,
    min_confidence: f32,
}

impl<R: BufRead> FeedReader<R> {
    pub fn new(reader: R, name: String, config: &ReplayConfig) -> Self {
        Self {
            reader,
            name,
            line_no: 0,
            frames_read: 0,
            frame_stride: u64::from(config.frame_stride.max(1)),
            min_confidence: config.min_confidence,
        }
    }

    /// Next frame due for processing, or `None` at end of feed.
    pub fn read_frame(&mut self) -> Result<Option<TrackerFrame>> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("{}:{}", self.name, self.line_no + 1))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            self.frames_read += 1;
            if self.frames_read % self.frame_stride != 0 {
                continue;
            }

            let mut frame: TrackerFrame = serde_json::from_str(trimmed)
                .with_context(|| format!("{}:{}: malformed frame", self.name, self.line_no))?;

            let before = frame.detections.len();
            let min_confidence = self.min_confidence;
            // unscored detections were thresholded before recording
            frame
                .detections
                .retain(|d| d.confidence.map_or(true, |c| c >= min_confidence));
            if frame.detections.len() < before {
                debug!(
                    "Frame {}: dropped {} low-confidence detection(s)",
                    frame.frame_id,
                    before - frame.detections.len()
                );
            }

            return Ok(Some(frame));
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn replay_config(frame_stride: u32, min_confidence: f32) -> ReplayConfig {
        ReplayConfig {
            input_dir: String::new(),
            frame_stride,
            min_confidence,
            max_frames: None,
        }
    }

    fn feed(lines: &[String]) -> Cursor<Vec<u8>> {
        Cursor::new(lines.join("\n").into_bytes())
    }

    fn line(frame_id: u64) -> String {
        format!(
            r#"{{"frame_id":{},"width":1280,"height":720,"detections":[{{"class_name":"car","bbox":[600,400,700,700],"confidence":0.8,"track_id":7}},{{"class_name":"person","bbox":[100,500,140,690],"confidence":0.2}}]}}"#,
            frame_id
        )
    }

    #[test]
    fn test_reads_every_frame_with_stride_one() {
        let lines: Vec<String> = (1..=3).map(line).collect();
        let mut reader = FeedReader::new(feed(&lines), "test".into(), &replay_config(1, 0.0));

        let mut ids = Vec::new();
        while let Some(frame) = reader.read_frame().unwrap() {
            ids.push(frame.frame_id);
        }
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(reader.frames_read(), 3);
    }

    #[test]
    fn test_stride_keeps_every_third_frame() {
        let lines: Vec<String> = (1..=7).map(line).collect();
        let mut reader = FeedReader::new(feed(&lines), "test".into(), &replay_config(3, 0.0));

        let mut ids = Vec::new();
        while let Some(frame) = reader.read_frame().unwrap() {
            ids.push(frame.frame_id);
        }
        assert_eq!(ids, vec![3, 6]);
    }

    #[test]
    fn test_low_confidence_dropped() {
        let lines = vec![line(1)];
        let mut reader = FeedReader::new(feed(&lines), "test".into(), &replay_config(1, 0.4));
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.detections.len(), 1);
        assert_eq!(frame.detections[0].track_id, Some(7));
        let anchor = frame.detections[0].bbox.anchor();
        assert!((anchor.x - 650.0).abs() < 1e-3 && (anchor.y - 700.0).abs() < 1e-3);
    }

    #[test]
    fn test_unscored_detection_kept() {
        let lines = vec![
            r#"{"frame_id":1,"width":100,"height":100,"detections":[{"class_name":"car","bbox":[45,70,55,90],"track_id":7}]}"#
                .to_string(),
        ];
        let mut reader = FeedReader::new(feed(&lines), "test".into(), &replay_config(1, 0.4));
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.detections.len(), 1);
        assert_eq!(frame.detections[0].confidence, None);
        assert_eq!(frame.detections[0].track_id, Some(7));
    }

    #[test]
    fn test_find_feeds_walks_input_dir() {
        let root = std::env::temp_dir().join(format!("bike-feeds-{}", std::process::id()));
        let nested = root.join("ride_02");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("a.jsonl"), line(1)).unwrap();
        std::fs::write(root.join("b.NDJSON"), line(1)).unwrap();
        std::fs::write(root.join("notes.txt"), "not a feed").unwrap();
        std::fs::write(nested.join("c.jsonl"), line(1)).unwrap();

        let mut config = replay_config(1, 0.0);
        config.input_dir = root.display().to_string();
        let feeds = ReplaySource::new(config).find_feeds().unwrap();
        std::fs::remove_dir_all(&root).unwrap();

        let names: Vec<String> = feeds
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        assert_eq!(names, vec!["a.jsonl", "b.NDJSON", "c.jsonl"]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let lines = vec![String::new(), line(1), "   ".to_string(), line(2)];
        let mut reader = FeedReader::new(feed(&lines), "test".into(), &replay_config(1, 0.0));
        assert_eq!(reader.read_frame().unwrap().map(|f| f.frame_id), Some(1));
        assert_eq!(reader.read_frame().unwrap().map(|f| f.frame_id), Some(2));
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line_reports_location() {
        let lines = vec![line(1), "{not json".to_string()];
        let mut reader = FeedReader::new(feed(&lines), "ride.jsonl".into(), &replay_config(1, 0.0));
        reader.read_frame().unwrap();
        let err = reader.read_frame().unwrap_err();
        assert!(format!("{}", err).contains("ride.jsonl:2"));
    }
}
