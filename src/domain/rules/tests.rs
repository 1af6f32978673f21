// Unit tests for trim rules and filter mapping

use super::*;

fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 0.01)
}

#[test]
fn test_trim_rules_bounds_and_minimum() {
    assert!(TrimRules::is_valid(&TrimRange::new(0, 1000), 1000));
    assert!(TrimRules::is_valid(&TrimRange::new(2000, 9000), 10_000));
    assert!(!TrimRules::is_valid(&TrimRange::new(0, 999), 10_000));
    assert!(!TrimRules::is_valid(&TrimRange::new(0, 10_001), 10_000));
    assert!(!TrimRules::is_valid(&TrimRange::new(5000, 5000), 10_000));
    assert!(!TrimRules::is_valid(&TrimRange::new(6000, 5000), 10_000));
}

#[test]
fn test_none_maps_to_empty_chain() {
    assert!(FilterMapper::effect_chain(VideoFilter::None).is_empty());
    assert!(FilterMapper::preview_matrix(VideoFilter::None).is_none());
}

#[test]
fn test_sepia_chain_is_single_matrix() {
    let chain = FilterMapper::effect_chain(VideoFilter::Sepia);
    assert_eq!(chain.len(), 1);
    match chain[0] {
        ColorTransform::Matrix { matrix } => {
            assert_eq!(matrix.rows()[0], [0.393, 0.769, 0.189, 0.0, 0.0]);
            assert_eq!(matrix.rows()[1], [0.349, 0.686, 0.168, 0.0, 0.0]);
            assert_eq!(matrix.rows()[2], [0.272, 0.534, 0.131, 0.0, 0.0]);
            assert_eq!(matrix.rows()[3], [0.0, 0.0, 0.0, 1.0, 0.0]);
        }
        other => panic!("unexpected transform {:?}", other),
    }
}

#[test]
fn test_preset_chains() {
    assert_eq!(
        FilterMapper::effect_chain(VideoFilter::BlackWhite),
        vec![ColorTransform::Grayscale]
    );
    assert_eq!(
        FilterMapper::effect_chain(VideoFilter::Inverted),
        vec![ColorTransform::Invert]
    );
    assert_eq!(
        FilterMapper::effect_chain(VideoFilter::Dark),
        vec![ColorTransform::Matrix {
            matrix: ColorMatrix::diagonal(0.4, 0.4, 0.4, 1.0)
        }]
    );
    assert_eq!(
        FilterMapper::effect_chain(VideoFilter::Warm),
        vec![ColorTransform::Matrix {
            matrix: ColorMatrix::diagonal(1.3, 1.1, 0.8, 1.0)
        }]
    );
    assert_eq!(
        FilterMapper::effect_chain(VideoFilter::HighContrast),
        vec![ColorTransform::Contrast { amount: 0.5 }]
    );
}

#[test]
fn test_every_preset_keeps_alpha_row() {
    for filter in VideoFilter::ALL {
        if let Some(matrix) = FilterMapper::preview_matrix(filter) {
            assert_eq!(matrix.rows()[3], [0.0, 0.0, 0.0, 1.0, 0.0], "{filter}");
        }
    }
}

#[test]
fn test_invert_matrix_flips_channels() {
    let out = ColorMatrix::INVERT.apply([255.0, 0.0, 100.0, 255.0]);
    assert!(approx(out, [0.0, 255.0, 155.0, 255.0]));
    assert!(ColorMatrix::INVERT.has_translation());
    assert_eq!(ColorMatrix::INVERT.translation(), [255.0, 255.0, 255.0, 0.0]);
}

#[test]
fn test_grayscale_matrix_equalizes_channels() {
    let out = ColorMatrix::GRAYSCALE.apply([200.0, 40.0, 90.0, 255.0]);
    assert!((out[0] - out[1]).abs() < f32::EPSILON);
    assert!((out[1] - out[2]).abs() < f32::EPSILON);
    // white stays white
    let white = ColorMatrix::GRAYSCALE.apply([255.0, 255.0, 255.0, 255.0]);
    assert!(approx(white, [255.0, 255.0, 255.0, 255.0]));
}

#[test]
fn test_contrast_keeps_midpoint() {
    let matrix = ColorTransform::Contrast { amount: 0.5 }.to_matrix();
    let mid = matrix.apply([127.5, 127.5, 127.5, 255.0]);
    assert!(approx(mid, [127.5, 127.5, 127.5, 255.0]));
    let bright = matrix.apply([200.0, 200.0, 200.0, 255.0]);
    assert!(bright[0] > 200.0);
    let dark = matrix.apply([50.0, 50.0, 50.0, 255.0]);
    assert!(dark[0] < 50.0);
}

#[test]
fn test_warm_clamps_to_range() {
    let out = ColorMatrix::WARM.apply([250.0, 100.0, 100.0, 255.0]);
    assert!(approx(out, [255.0, 110.0, 80.0, 255.0]));
}

#[test]
fn test_coefficients_split() {
    let coefficients = ColorMatrix::SEPIA.coefficients();
    assert_eq!(coefficients[0], [0.393, 0.769, 0.189, 0.0]);
    assert!(!ColorMatrix::SEPIA.has_translation());
}

#[test]
fn test_export_job_from_session() {
    let session = Session::empty()
        .reduce(&SessionEvent::SelectSource(SourceSelection::new(
            SourceRef::new("in.mp4"),
            10_000,
        )))
        .reduce(&SessionEvent::SetTrim {
            start_ms: 2000,
            end_ms: 9000,
        })
        .reduce(&SessionEvent::SetFilter(VideoFilter::Sepia));

    let job = ExportJob::from_session(&session).unwrap();
    assert_eq!(job.source, SourceRef::new("in.mp4"));
    assert_eq!(job.clip_range, TrimRange::new(2000, 9000));
    assert_eq!(job.effect_chain, FilterMapper::effect_chain(VideoFilter::Sepia));
}

#[test]
fn test_export_job_requires_source() {
    assert!(ExportJob::from_session(&Session::empty()).is_none());
}

#[test]
fn test_effect_chain_ignores_session() {
    let a = Session::empty().reduce(&SessionEvent::SelectSource(SourceSelection::new(
        SourceRef::new("a.mp4"),
        5000,
    )));
    let b = Session::empty().reduce(&SessionEvent::SelectSource(SourceSelection::new(
        SourceRef::new("b.mp4"),
        90_000,
    )));
    for filter in VideoFilter::ALL {
        let ja = ExportJob::from_session(&a.reduce(&SessionEvent::SetFilter(filter))).unwrap();
        let jb = ExportJob::from_session(&b.reduce(&SessionEvent::SetFilter(filter))).unwrap();
        assert_eq!(ja.effect_chain, jb.effect_chain);
    }
}

#[test]
fn test_preview_matrix_matches_chain() {
    assert_eq!(
        FilterMapper::preview_matrix(VideoFilter::Sepia),
        Some(ColorMatrix::SEPIA)
    );
    assert_eq!(
        FilterMapper::preview_matrix(VideoFilter::HighContrast),
        Some(ColorMatrix::contrast(1.5))
    );
}
