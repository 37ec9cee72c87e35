use std::future::Future;
use std::pin::pin;

use async_std::channel::{self, Receiver, Sender};
use futures_util::future::{self, Either};


// Cooperative cancellation shared between a game loop and whoever controls it. Nothing is
// ever sent over the channel: closing it is the signal, and every receiver observes it.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    sender: Sender<()>,
    receiver: Receiver<()>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (sender, receiver) = channel::bounded(1);
        CancellationToken { sender, receiver }
    }

    pub fn cancel(&self) { self.sender.close(); }
    pub fn is_cancelled(&self) -> bool { self.sender.is_closed() }

    // Resolves once `cancel` has been called.
    pub async fn cancelled(&self) { while self.receiver.recv().await.is_ok() {} }

    // Runs `fut` to completion unless cancelled first, in which case `fut` is dropped.
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        let fut = pin!(fut);
        let cancelled = pin!(self.cancelled());
        match future::select(fut, cancelled).await {
            Either::Left((output, _)) => Some(output),
            Either::Right(((), _)) => None,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self { Self::new() }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[async_std::test]
    async fn completes_when_not_cancelled() {
        let token = CancellationToken::new();
        assert_eq!(token.run_until_cancelled(async { 7 }).await, Some(7));
        assert!(!token.is_cancelled());
    }

    #[async_std::test]
    async fn cancel_interrupts_pending_future() {
        let token = CancellationToken::new();
        let remote = token.clone();
        async_std::task::spawn(async move {
            async_std::task::sleep(Duration::from_millis(10)).await;
            remote.cancel();
        });
        let result = token.run_until_cancelled(future::pending::<()>()).await;
        assert_eq!(result, None);
        assert!(token.is_cancelled());
    }

    #[async_std::test]
    async fn cancelled_token_skips_work() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(token.run_until_cancelled(async { 7 }).await, None);
    }
}
