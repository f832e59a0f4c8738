use crate::detection::measurement::Measurement;
use crate::detection::parser::try_parse;
use crate::distance::{compute_distance, DistanceEstimate, Mode};
use crate::prelude::CalibResult;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// A parsed measurement together with its distance estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub measurement: Measurement,
    pub estimate: DistanceEstimate,
}

/// Filters detection lines and turns them into distance estimates for one mode.
pub struct MeasurementExtractor {
    mode: Mode,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl MeasurementExtractor {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            logger: LogManager::new("extractor"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `Ok(None)` for lines that carry no detection record.
    pub fn extract(&self, line: &str) -> CalibResult<Option<Detection>> {
        self.metrics.record_line();

        let outcome = try_parse(line).and_then(|parsed| {
            parsed
                .map(|measurement| {
                    compute_distance(&measurement, self.mode).map(|estimate| Detection {
                        measurement,
                        estimate,
                    })
                })
                .transpose()
        });

        match &outcome {
            Ok(Some(detection)) => {
                self.metrics.record_detection();
                self.logger
                    .detail(&format!("detection {:?}", detection.measurement));
            }
            Ok(None) => {}
            Err(err) => {
                self.metrics.record_rejected();
                self.logger.warn(&format!("rejected line: {}", err));
            }
        }

        outcome
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::template::format_detection_line;
    use crate::distance::{BatchEstimate, LiveEstimate};
    use crate::prelude::CalibError;

    #[test]
    fn batch_extractor_yields_width_and_height_estimates() {
        let extractor = MeasurementExtractor::new(Mode::Batch);
        let detection = extractor
            .extract(&format_detection_line(358, 271, 71, 36, 0.91))
            .unwrap()
            .unwrap();
        assert_eq!(detection.measurement, Measurement::new(358, 271, 71, 36));
        match detection.estimate {
            DistanceEstimate::Batch(BatchEstimate { by_width, by_height }) => {
                assert!((by_width - 72.22824).abs() < 1e-3);
                assert!((by_height - 72.09389).abs() < 1e-3);
            }
            other => panic!("unexpected estimate {:?}", other),
        }
    }

    #[test]
    fn live_extractor_yields_corrected_estimate() {
        let extractor = MeasurementExtractor::new(Mode::Live);
        let detection = extractor
            .extract(&format_detection_line(320, 240, 63, 30, 1.0))
            .unwrap()
            .unwrap();
        match detection.estimate {
            DistanceEstimate::Live(LiveEstimate {
                uncorrected,
                corrected,
            }) => {
                assert!((uncorrected - 6329.113924 / 63.0).abs() < 1e-9);
                assert!((corrected - uncorrected).abs() < 1e-3);
            }
            other => panic!("unexpected estimate {:?}", other),
        }
    }

    #[test]
    fn counters_track_every_outcome() {
        let extractor = MeasurementExtractor::new(Mode::Batch);
        assert!(extractor.extract("noise").unwrap().is_none());
        assert!(extractor
            .extract(&format_detection_line(1, 2, 3, 4, 0.5))
            .unwrap()
            .is_some());
        assert!(matches!(
            extractor.extract("Found target at 1.00, 2.00"),
            Err(CalibError::MalformedDetectionLine { .. })
        ));
        assert!(matches!(
            extractor.extract(&format_detection_line(1, 2, 0, 4, 0.5)),
            Err(CalibError::DivisionByZero { .. })
        ));

        let snapshot = extractor.metrics();
        assert_eq!(snapshot.lines, 4);
        assert_eq!(snapshot.detections, 1);
        assert_eq!(snapshot.rejected, 2);
    }
}
