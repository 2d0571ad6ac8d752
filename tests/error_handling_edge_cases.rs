//! Error handling and edge case testing
//!
//! Rejections, remover failures, timeouts and boundary conditions at the
//! controller level.

use bgremove_studio::{
    error::{IntakeError, Result},
    IntakeConfig, IntakeController, MockBehavior, MockRemover, UiStateKind, UploadCandidate,
    DEFAULT_MAX_FILE_SIZE,
};
use std::time::Duration;

fn png(name: &str, size: usize) -> UploadCandidate {
    UploadCandidate::new(name, "image/png", vec![0x42; size])
}

#[tokio::test]
async fn test_non_image_rejected_without_remover_call() {
    let mock = MockRemover::new();
    let mut controller = IntakeController::new(IntakeConfig::default(), mock.clone()).unwrap();

    let err = controller
        .dispatch(UploadCandidate::new("doc.pdf", "application/pdf", vec![0; 128]))
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::InvalidType { .. }));
    assert_eq!(err.user_message(), "Please select a valid image file");
    assert_eq!(controller.state().kind(), UiStateKind::Error);
    assert_eq!(controller.live_references(), 0);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_oversized_image_rejected_without_remover_call() {
    let mock = MockRemover::new();
    let mut controller = IntakeController::new(IntakeConfig::default(), mock.clone()).unwrap();

    let err = controller
        .dispatch(png("huge.png", 11 * 1024 * 1024))
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::TooLarge { .. }));
    assert_eq!(
        controller.state().error_message().as_deref(),
        Some("File size must be less than 10MB")
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_size_limit_boundary() -> Result<()> {
    let limit = DEFAULT_MAX_FILE_SIZE as usize;
    let mock = MockRemover::new();
    let mut controller = IntakeController::new(IntakeConfig::default(), mock.clone())?;

    controller.dispatch(png("exact.png", limit)).await?;
    assert_eq!(controller.state().kind(), UiStateKind::Result);

    let err = controller.dispatch(png("over.png", limit + 1)).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(mock.call_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_and_odd_media_types() {
    let mut controller = IntakeController::new(IntakeConfig::default(), MockRemover::new()).unwrap();

    for media_type in ["", "text/plain", "video/mp4", "imagex/png"] {
        let err = controller
            .dispatch(UploadCandidate::new("file", media_type, vec![1; 4]))
            .await
            .unwrap_err();
        assert!(
            matches!(err, IntakeError::InvalidType { .. }),
            "{media_type:?} should be rejected"
        );
    }

    controller
        .dispatch(UploadCandidate::new("scan.tiff", "IMAGE/TIFF", vec![1; 4]))
        .await
        .expect("media type prefix match ignores case");
}

#[tokio::test]
async fn test_remover_failure_shows_generic_message() {
    let mock = MockRemover::new_failing("onnx session crashed: out of memory");
    let mut controller = IntakeController::new(IntakeConfig::default(), mock.clone()).unwrap();

    let err = controller.dispatch(png("cat.png", 64)).await.unwrap_err();

    assert!(err.is_processing_failure());
    assert_eq!(
        controller.state().error_message().as_deref(),
        Some("Failed to remove background. Please try again.")
    );
    // The original preview is released with the failed attempt.
    assert_eq!(controller.live_references(), 0);
    assert!(controller.download().is_err());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_remover_times_out() {
    let config = IntakeConfig::builder()
        .processing_timeout(Some(Duration::from_secs(30)))
        .build()
        .unwrap();
    let mut controller = IntakeController::new(config, MockRemover::new_hanging()).unwrap();

    let err = controller.dispatch(png("cat.png", 64)).await.unwrap_err();

    assert!(err.is_processing_failure());
    assert_eq!(controller.state().kind(), UiStateKind::Error);
    assert_eq!(controller.live_references(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_remover_without_timeout_completes() -> Result<()> {
    let mock = MockRemover::with_behavior(MockBehavior::Delay(
        Duration::from_secs(600),
        vec![0x89, 0x50, 0x4E, 0x47],
    ));
    let mut controller = IntakeController::new(IntakeConfig::default(), mock)?;

    controller.dispatch(png("slow.png", 64)).await?;
    assert_eq!(controller.state().kind(), UiStateKind::Result);

    Ok(())
}

#[tokio::test]
async fn test_busy_while_processing() {
    let mut controller = IntakeController::new(IntakeConfig::default(), MockRemover::new()).unwrap();

    let ticket = controller.begin(png("first.png", 16)).unwrap();
    let err = controller.begin(png("second.png", 16)).unwrap_err();

    assert!(matches!(err, IntakeError::Busy));
    assert!(controller.state().is_processing());
    assert_eq!(controller.selected_file(), Some("first.png"));

    controller.on_failure(ticket, IntakeError::processing("boom"));
    assert_eq!(controller.state().kind(), UiStateKind::Error);
}

#[tokio::test]
async fn test_late_completion_after_reset_is_ignored() {
    let mut controller = IntakeController::new(IntakeConfig::default(), MockRemover::new()).unwrap();

    let ticket = controller.begin(png("cat.png", 16)).unwrap();
    controller.reset();
    assert_eq!(controller.live_references(), 0);

    controller.on_complete(ticket, vec![1, 2, 3]);
    assert!(controller.state().is_idle());
    assert_eq!(controller.live_references(), 0);
}

#[test]
fn test_download_without_result() {
    let controller = IntakeController::new(IntakeConfig::default(), MockRemover::new()).unwrap();
    assert!(matches!(controller.download(), Err(IntakeError::NoResult)));
}

#[test]
fn test_invalid_config_rejected() {
    let config = IntakeConfig {
        max_file_size: 0,
        ..IntakeConfig::default()
    };
    let err = IntakeController::new(config, MockRemover::new()).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidConfig(_)));
}

#[test]
fn test_reset_and_dismiss_are_idempotent() {
    let mut controller = IntakeController::new(IntakeConfig::default(), MockRemover::new()).unwrap();

    controller.reset();
    controller.reset();
    controller.dismiss_error();
    assert!(controller.state().is_idle());
}

#[tokio::test]
async fn test_reset_from_validation_error_and_processing_failure() {
    let mut controller = IntakeController::new(IntakeConfig::default(), MockRemover::new()).unwrap();

    let _ = controller
        .dispatch(png("huge.png", 11 * 1024 * 1024))
        .await;
    assert_eq!(controller.state().kind(), UiStateKind::Error);

    controller.reset();
    assert!(controller.state().is_idle());
    assert_eq!(controller.live_references(), 0);
    assert!(controller.selected_file().is_none());

    let mut controller =
        IntakeController::new(IntakeConfig::default(), MockRemover::new_failing("exit 1")).unwrap();

    let _ = controller.dispatch(png("cat.png", 64)).await;
    assert!(controller.state().error().is_some_and(IntakeError::is_processing_failure));

    controller.reset();
    assert!(controller.state().is_idle());
    assert_eq!(controller.live_references(), 0);
    assert!(controller.selected_file().is_none());
}

#[tokio::test]
async fn test_too_large_banner_follows_configured_limit() {
    let config = IntakeConfig::builder()
        .max_file_size(5 * 1024 * 1024)
        .build()
        .unwrap();
    let mock = MockRemover::new();
    let mut controller = IntakeController::new(config, mock.clone()).unwrap();

    let err = controller
        .dispatch(png("big.png", 7 * 1024 * 1024))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "File size must be less than 5MB");
    assert_eq!(
        controller.state().error_message().as_deref(),
        Some("File size must be less than 5MB")
    );
    assert_eq!(mock.call_count(), 0);
}
