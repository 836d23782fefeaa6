use std::pin::Pin;

type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A tokio runtime on its own thread, for callers that are not async themselves.
pub struct TokioThread {
    tokio: TokioHandle,
    _tokio_thread_handle: std::thread::JoinHandle<()>,
}
#[derive(Clone)]
pub struct TokioHandle(tokio::sync::mpsc::Sender<Task>);
impl TokioHandle {
    /// Must not be called from within the runtime.
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        if self.0.blocking_send(Box::pin(task)).is_err() {
            tracing::warn!("Tokio thread has shut down; dropping task");
        }
    }
}
impl TokioThread {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (tokio_tx, mut tokio_rx) = tokio::sync::mpsc::channel::<Task>(100);
        let tokio = TokioHandle(tokio_tx);

        let tokio_thread_handle = std::thread::Builder::new()
            .name("cadence-tokio".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    while let Some(task) = tokio_rx.recv().await {
                        tokio::spawn(task);
                    }
                });
            })?;

        Ok(Self {
            tokio,
            _tokio_thread_handle: tokio_thread_handle,
        })
    }

    pub fn handle(&self) -> TokioHandle {
        self.tokio.clone()
    }
}
