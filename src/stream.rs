//! Streaming bulk API: emit ad groups as they complete.
//!
//! A bulk file with a few hundred rows takes several minutes at the default
//! pacing. [`generate_bulk_stream`] yields each [`AdGroupResult`] as soon as
//! its model call returns, so callers can show partial results or append to
//! an export incrementally.
//!
//! Rows are processed strictly one at a time, in input order, with
//! `bulk_delay_ms` between consecutive model calls. A failed row is still
//! yielded, with `error` set and an empty asset set.

use crate::config::GenerationConfig;
use crate::error::AdCopyError;
use crate::generate::default_collaborators;
use crate::output::AdGroupResult;
use crate::pipeline::fetch::ContextFetcher;
use crate::pipeline::llm::CopyGenerator;
use crate::tabular::AdGroupRequest;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-ad-group results.
pub type AdGroupStream = Pin<Box<dyn Stream<Item = AdGroupResult> + Send>>;

/// Generate a bulk run as a stream.
///
/// # Returns
/// - `Ok(AdGroupStream)`: one item per request, in request order
/// - `Err(AdCopyError)`: no LLM provider could be configured
///
/// # Example
/// ```rust,no_run
/// use adcopy::{generate_bulk_stream, read_bulk_file, GenerationConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let input = read_bulk_file("rows.csv")?;
/// let config = GenerationConfig::default();
/// let mut stream = generate_bulk_stream(input.requests, &config)?;
/// while let Some(result) = stream.next().await {
///     match result.error {
///         None => println!("{}: {} headlines", result.ad_group, result.assets.headlines.len()),
///         Some(e) => eprintln!("{}: {e}", result.ad_group),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn generate_bulk_stream(
    requests: Vec<AdGroupRequest>,
    config: &GenerationConfig,
) -> Result<AdGroupStream, AdCopyError> {
    let (fetcher, generator) = default_collaborators(config)?;
    Ok(bulk_stream(requests, fetcher, generator, config.clone()))
}

/// Stream a bulk run with explicit collaborators.
pub fn bulk_stream(
    requests: Vec<AdGroupRequest>,
    fetcher: Arc<dyn ContextFetcher>,
    generator: Arc<dyn CopyGenerator>,
    config: GenerationConfig,
) -> AdGroupStream {
    let total = requests.len();
    info!("Streaming {} ad groups", total);

    let s = stream::iter(requests.into_iter().enumerate()).then(move |(idx, request)| {
        let fetcher = Arc::clone(&fetcher);
        let generator = Arc::clone(&generator);
        let cfg = config.clone();
        async move {
            let row_num = idx + 1;
            if idx > 0 && cfg.bulk_delay_ms > 0 {
                sleep(Duration::from_millis(cfg.bulk_delay_ms)).await;
            }

            if let Some(ref cb) = cfg.progress_callback {
                cb.on_row_start(row_num, total);
            }

            let result =
                crate::generate::generate_with(&request, fetcher.as_ref(), generator.as_ref(), &cfg)
                    .await;

            if let Some(ref cb) = cfg.progress_callback {
                match result.error {
                    None => cb.on_row_complete(row_num, total, &result.ad_group),
                    Some(ref e) => cb.on_row_error(row_num, total, &e.to_string()),
                }
            }

            result
        }
    });

    Box::pin(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::pipeline::llm::Completion;
    use crate::progress::BatchProgressCallback;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoFetcher;

    #[async_trait]
    impl ContextFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> String {
            format!("Landing page at {url}")
        }
    }

    /// Fails every request whose prompt mentions "broken".
    struct SelectiveGenerator;

    #[async_trait]
    impl CopyGenerator for SelectiveGenerator {
        async fn generate(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
        ) -> Result<Completion, GenerationError> {
            if user_prompt.contains("broken") {
                return Err(GenerationError::LlmFailed {
                    detail: "upstream 500".into(),
                });
            }
            Ok(Completion {
                content: r#"{"headlines": ["Top Rated Plans"], "descriptions": []}"#.into(),
                input_tokens: 10,
                output_tokens: 5,
            })
        }

        fn model_label(&self) -> String {
            "selective".into()
        }
    }

    #[derive(Default)]
    struct RecordingCallback {
        events: Mutex<Vec<String>>,
    }

    impl BatchProgressCallback for RecordingCallback {
        fn on_row_start(&self, row_num: usize, total_rows: usize) {
            self.events.lock().unwrap().push(format!("start {row_num}/{total_rows}"));
        }
        fn on_row_complete(&self, row_num: usize, _total_rows: usize, ad_group: &str) {
            self.events.lock().unwrap().push(format!("done {row_num} {ad_group}"));
        }
        fn on_row_error(&self, row_num: usize, _total_rows: usize, _error: &str) {
            self.events.lock().unwrap().push(format!("error {row_num}"));
        }
    }

    fn request(ad_group: &str) -> AdGroupRequest {
        AdGroupRequest {
            campaign: "Bulk".into(),
            ad_group: ad_group.into(),
            category: "VoIP".into(),
            url: format!("https://{ad_group}.example"),
        }
    }

    #[tokio::test]
    async fn stream_preserves_order_and_reports_progress() {
        let cb = Arc::new(RecordingCallback::default());
        let config = GenerationConfig::builder()
            .bulk_delay_ms(0)
            .progress_callback(cb.clone())
            .build()
            .unwrap();

        let results: Vec<AdGroupResult> = bulk_stream(
            vec![request("first"), request("broken"), request("third")],
            Arc::new(EchoFetcher),
            Arc::new(SelectiveGenerator),
            config,
        )
        .collect()
        .await;

        let names: Vec<&str> = results.iter().map(|r| r.ad_group.as_str()).collect();
        assert_eq!(names, vec!["first", "broken", "third"]);
        assert!(results[1].error.is_some());
        assert!(results[1].assets.is_empty());
        assert_eq!(results[2].assets.headlines.len(), 15);

        let events = cb.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start 1/3",
                "done 1 first",
                "start 2/3",
                "error 2",
                "start 3/3",
                "done 3 third",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stream_waits_between_rows() {
        let config = GenerationConfig::builder().bulk_delay_ms(1500).build().unwrap();
        let started = tokio::time::Instant::now();

        let results: Vec<AdGroupResult> = bulk_stream(
            vec![request("a"), request("b"), request("c")],
            Arc::new(EchoFetcher),
            Arc::new(SelectiveGenerator),
            config,
        )
        .collect()
        .await;

        assert_eq!(results.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }
}
