//! FFmpeg execution adapter
//!
//! Runs export jobs through the `ffmpeg` command-line tool. The effect chain
//! is translated into an ffmpeg filter graph.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::QuickCutConfig;
use crate::domain::errors::*;
use crate::domain::rules::{ColorMatrix, ColorTransform, ExportJob};
use crate::ports::*;
use crate::utils::time::ms_to_seconds_arg;

/// Encoder settings handed to ffmpeg
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub ffmpeg_path: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub crf: u8,
    pub preset: String,
}

impl EncoderSettings {
    pub fn from_config(config: &QuickCutConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
            crf: config.crf,
            preset: config.preset.clone(),
        }
    }
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self::from_config(&QuickCutConfig::default())
    }
}

/// FFmpeg-based transform engine
pub struct FfmpegEngineAdapter {
    settings: EncoderSettings,
}

impl FfmpegEngineAdapter {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    /// ffmpeg arguments for `job`, writing to `output_path`
    pub fn build_args(&self, job: &ExportJob, output_path: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            job.source.as_str().to_string(),
            "-ss".into(),
            ms_to_seconds_arg(job.clip_range.start_ms),
            "-t".into(),
            ms_to_seconds_arg(job.clip_range.duration_ms()),
        ];

        if let Some(graph) = filter_graph(&job.effect_chain) {
            args.push("-vf".into());
            args.push(graph);
        }

        args.extend([
            "-c:v".into(),
            self.settings.video_codec.clone(),
            "-preset".into(),
            self.settings.preset.clone(),
            "-crf".into(),
            self.settings.crf.to_string(),
            "-c:a".into(),
            self.settings.audio_codec.clone(),
            "-movflags".into(),
            "+faststart".into(),
            "-f".into(),
            "mp4".into(),
            output_path.to_string_lossy().to_string(),
        ]);

        args
    }
}

#[async_trait]
impl TransformEngine for FfmpegEngineAdapter {
    async fn transform(
        &self,
        job: &ExportJob,
        output_path: &Path,
    ) -> Result<TransformOutput, DomainError> {
        let args = self.build_args(job, output_path);
        debug!(program = %self.settings.ffmpeg_path, ?args, "spawning ffmpeg");
        let started = Instant::now();

        let output = Command::new(&self.settings.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::TransformFail(format!(
                    "Failed to start {}: {}",
                    self.settings.ffmpeg_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::TransformFail(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                last_lines(&stderr, 5)
            )));
        }

        let elapsed = started.elapsed();
        info!(
            output = %output_path.display(),
            elapsed_ms = elapsed.as_millis() as u64,
            "ffmpeg finished"
        );
        Ok(TransformOutput {
            path: output_path.to_path_buf(),
            elapsed,
        })
    }
}

/// Translate an effect chain to an ffmpeg `-vf` graph; `None` when empty
pub fn filter_graph(chain: &[ColorTransform]) -> Option<String> {
    if chain.is_empty() {
        return None;
    }
    let mut stages: Vec<String> = chain.iter().flat_map(filter_stages).collect();
    // back to a pixel format every encoder takes
    stages.push("format=yuv420p".to_string());
    Some(stages.join(","))
}

fn filter_stages(transform: &ColorTransform) -> Vec<String> {
    match transform {
        ColorTransform::Grayscale => vec!["hue=s=0".to_string()],
        ColorTransform::Invert => vec!["negate".to_string()],
        ColorTransform::Contrast { amount } => {
            vec![format!("eq=contrast={}", format_coefficient(1.0 + amount))]
        }
        ColorTransform::Matrix { matrix } => matrix_stages(matrix),
    }
}

fn matrix_stages(matrix: &ColorMatrix) -> Vec<String> {
    if matrix.has_translation() {
        // offsets must land before the final clip, so the whole row goes in one expression
        return vec![affine_stage(matrix)];
    }

    const CHANNELS: [char; 4] = ['r', 'g', 'b', 'a'];
    let coefficients = matrix.coefficients();

    let mixer: Vec<String> = CHANNELS
        .iter()
        .enumerate()
        .flat_map(|(i, out)| {
            let row = coefficients[i];
            CHANNELS
                .iter()
                .enumerate()
                .map(move |(j, input)| format!("{}{}={}", out, input, format_coefficient(row[j])))
        })
        .collect();

    vec![format!("colorchannelmixer={}", mixer.join(":"))]
}

/// `geq` stage computing `clip(w_r*r + w_g*g + w_b*b + offset, 0, 255)` per color channel
fn affine_stage(matrix: &ColorMatrix) -> String {
    const INPUTS: [&str; 3] = ["r(X,Y)", "g(X,Y)", "b(X,Y)"];
    const OUTPUTS: [char; 3] = ['r', 'g', 'b'];

    let channels: Vec<String> = OUTPUTS
        .iter()
        .zip(matrix.rows().iter())
        .map(|(out, row)| {
            let mut terms: Vec<String> = INPUTS
                .iter()
                .zip(row.iter())
                .filter(|(_, weight)| **weight != 0.0)
                .map(|(input, weight)| format!("({})*{}", format_coefficient(*weight), input))
                .collect();
            terms.push(format!("({})", format_coefficient(row[4])));
            format!("{}='clip({},0,255)'", out, terms.join("+"))
        })
        .collect();

    format!("geq={}", channels.join(":"))
}

fn format_coefficient(value: f32) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::*;
    use crate::domain::rules::FilterMapper;

    fn job(filter: VideoFilter) -> ExportJob {
        ExportJob {
            source: SourceRef::new("/videos/in.mov"),
            clip_range: TrimRange::new(2000, 9000),
            effect_chain: FilterMapper::effect_chain(filter),
        }
    }

    #[test]
    fn test_no_filter_means_no_graph() {
        assert_eq!(filter_graph(&[]), None);
        let adapter = FfmpegEngineAdapter::new(EncoderSettings::default());
        let args = adapter.build_args(&job(VideoFilter::None), Path::new("/tmp/out.mp4"));
        assert!(!args.contains(&"-vf".to_string()));
    }

    #[test]
    fn test_clip_range_arguments() {
        let adapter = FfmpegEngineAdapter::new(EncoderSettings::default());
        let args = adapter.build_args(&job(VideoFilter::Sepia), Path::new("/tmp/out.mp4"));

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "2.000");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "7.000");
        assert_eq!(args.last().unwrap(), "/tmp/out.mp4");
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"18".to_string()));
    }

    #[test]
    fn test_simple_transforms() {
        assert_eq!(
            filter_graph(&[ColorTransform::Grayscale]).unwrap(),
            "hue=s=0,format=yuv420p"
        );
        assert_eq!(
            filter_graph(&[ColorTransform::Invert]).unwrap(),
            "negate,format=yuv420p"
        );
        assert_eq!(
            filter_graph(&[ColorTransform::Contrast { amount: 0.5 }]).unwrap(),
            "eq=contrast=1.5,format=yuv420p"
        );
    }

    #[test]
    fn test_sepia_mixer() {
        let graph = filter_graph(&FilterMapper::effect_chain(VideoFilter::Sepia)).unwrap();
        assert!(graph.starts_with("colorchannelmixer=rr=0.393:rg=0.769:rb=0.189:ra=0:gr=0.349"));
        assert!(graph.contains("aa=1"));
        assert!(!graph.contains("lutrgb"));
    }

    /// Split on `sep` outside single quotes
    fn split_unquoted(text: &str, sep: char) -> Vec<String> {
        let mut parts = vec![String::new()];
        let mut quoted = false;
        for c in text.chars() {
            if c == '\'' {
                quoted = !quoted;
            }
            if c == sep && !quoted {
                parts.push(String::new());
            } else {
                parts.last_mut().unwrap().push(c);
            }
        }
        parts
    }

    fn channel_index(name: &str) -> usize {
        match name {
            "r" => 0,
            "g" => 1,
            "b" => 2,
            "a" => 3,
            other => panic!("unknown channel {}", other),
        }
    }

    fn number(text: &str) -> f32 {
        text.trim_matches(|c| c == '(' || c == ')').parse().unwrap()
    }

    /// Evaluate `clip(<terms>,0,255)` as emitted by `affine_stage`
    fn eval_geq(expr: &str, rgb: [f32; 4]) -> f32 {
        let inner = expr
            .trim_matches('\'')
            .strip_prefix("clip(")
            .and_then(|e| e.strip_suffix(",0,255)"))
            .unwrap();
        let sum: f32 = inner
            .split('+')
            .map(|term| match term.split_once('*') {
                Some((weight, input)) => number(weight) * rgb[channel_index(&input[..1])],
                None => number(term),
            })
            .sum();
        sum.clamp(0.0, 255.0)
    }

    /// Run a pixel through the color stages of `graph`, clipping to 8 bits after each one
    fn run_graph(graph: &str, rgba: [f32; 4]) -> [f32; 4] {
        let mut pixel = rgba;
        for stage in split_unquoted(graph, ',') {
            let (name, options) = stage.split_once('=').unwrap();
            if name == "format" {
                continue;
            }
            let options: Vec<(String, String)> = split_unquoted(options, ':')
                .into_iter()
                .map(|o| {
                    let (k, v) = o.split_once('=').unwrap();
                    (k.to_string(), v.to_string())
                })
                .collect();
            pixel = match name {
                "colorchannelmixer" => {
                    let mut out = [0.0f32; 4];
                    for (key, value) in &options {
                        let (o, i) = key.split_at(1);
                        out[channel_index(o)] += number(value) * pixel[channel_index(i)];
                    }
                    out.map(|v| v.clamp(0.0, 255.0))
                }
                "geq" => {
                    let mut out = pixel;
                    for (key, value) in &options {
                        out[channel_index(key)] = eval_geq(value, pixel);
                    }
                    out
                }
                other => panic!("unexpected stage {}", other),
            };
        }
        pixel
    }

    fn assert_graph_matches(matrix: ColorMatrix, rgba: [f32; 4]) {
        let graph = filter_graph(&[ColorTransform::Matrix { matrix }]).unwrap();
        let actual = run_graph(&graph, rgba);
        let expected = matrix.apply(rgba);
        for c in 0..3 {
            assert!(
                (actual[c] - expected[c]).abs() < 0.5,
                "{} on {:?}: got {:?}, want {:?}",
                graph,
                rgba,
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_translation_is_one_affine_stage() {
        let graph = filter_graph(&[ColorTransform::Matrix {
            matrix: ColorMatrix::INVERT,
        }])
        .unwrap();
        assert_eq!(split_unquoted(&graph, ',').len(), 2);
        assert!(graph.starts_with("geq=r='clip((-1)*r(X,Y)+(255),0,255)'"));

        let out = run_graph(&graph, [100.0, 30.0, 200.0, 255.0]);
        assert_eq!(&out[..3], &[155.0, 225.0, 55.0]);
    }

    #[test]
    fn test_graph_matches_matrix_math() {
        let pixels = [
            [100.0, 30.0, 200.0, 255.0],
            [220.0, 220.0, 220.0, 255.0],
            [0.0, 128.0, 255.0, 255.0],
            [12.0, 250.0, 64.0, 255.0],
        ];
        let matrices = [
            ColorMatrix::INVERT,
            ColorMatrix::contrast(1.5),
            ColorMatrix::contrast(0.5),
            ColorMatrix::SEPIA,
            ColorMatrix::DARK,
            ColorMatrix::WARM,
            ColorMatrix::GRAYSCALE,
            ColorMatrix::from_rows([
                [0.5, 0.25, 0.0, 0.0, 40.0],
                [0.0, -0.5, 1.0, 0.0, -20.0],
                [0.3, 0.3, 0.3, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0, 0.0],
            ]),
        ];
        for matrix in matrices {
            for pixel in pixels {
                assert_graph_matches(matrix, pixel);
            }
        }
    }

    #[test]
    fn test_contrast_matrix_saturates_high_values() {
        let graph = filter_graph(&[ColorTransform::Matrix {
            matrix: ColorMatrix::contrast(1.5),
        }])
        .unwrap();
        let out = run_graph(&graph, [220.0, 220.0, 220.0, 255.0]);
        assert_eq!(out[0], 255.0);
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(0.4), "0.4");
        assert_eq!(format_coefficient(1.0), "1");
        assert_eq!(format_coefficient(0.0), "0");
        assert_eq!(format_coefficient(-0.0), "0");
        assert_eq!(format_coefficient(255.0), "255");
    }

    #[tokio::test]
    async fn test_missing_binary_is_transform_failure() {
        let settings = EncoderSettings {
            ffmpeg_path: "/nonexistent/quickcut-ffmpeg".to_string(),
            ..EncoderSettings::default()
        };
        let adapter = FfmpegEngineAdapter::new(settings);
        let result = adapter
            .transform(&job(VideoFilter::Dark), Path::new("/tmp/never.mp4"))
            .await;
        assert!(matches!(result, Err(DomainError::TransformFail(_))));
    }
}
