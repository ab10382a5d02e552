use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Trailing-edge debounce for search-as-you-type
///
/// Call [`settle`](Self::settle) on every keystroke; only the call that
/// isn't followed by another one within `delay` gets `true` back.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay. `false` means a newer call superseded this one.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_call_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(debouncer.settle().await);
    }

    #[tokio::test]
    async fn test_only_last_of_a_burst_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(50));

        let (first, second, third) = tokio::join!(
            debouncer.settle(),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                debouncer.settle().await
            },
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                debouncer.settle().await
            }
        );

        assert!(!first);
        assert!(!second);
        assert!(third);
    }

    #[tokio::test]
    async fn test_typing_only_suggests_for_the_settled_query() {
        use crate::suggestions::{popular_searches, suggest_from};

        let debouncer = Debouncer::new(Duration::from_millis(40));
        let popular = popular_searches();

        let keystroke = |query: &'static str, after_ms: u64| {
            let debouncer = debouncer.clone();
            let popular = popular.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(after_ms)).await;
                if debouncer.settle().await {
                    Some(suggest_from(&[], &popular, query, 5))
                } else {
                    None
                }
            }
        };

        let (p, ph, pho) = tokio::join!(keystroke("p", 0), keystroke("ph", 5), keystroke("pho", 10));

        assert!(p.is_none());
        assert!(ph.is_none());
        assert_eq!(pho, Some(vec!["phone".to_string(), "headphones".to_string()]));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let other = debouncer.clone();

        let (a, b) = tokio::join!(debouncer.settle(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            other.settle().await
        });

        assert!(!a);
        assert!(b);
    }
}
