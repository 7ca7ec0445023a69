use crate::{
    http::{
        protocol::{parse_request, write_response},
        HttpResponse,
    },
    websocket::{self, consts::headers::SEC_WEBSOCKET_KEY, websocket_handshake},
    ConnectionError, HandlerResult, ServerConfig,
};
use serde_json::Value;
use std::{
    io,
    net::{Shutdown, SocketAddr, TcpListener, TcpStream},
    panic::{self, AssertUnwindSafe},
    sync::{atomic::AtomicU64, atomic::Ordering, Arc},
};

mod default_handlers;
mod observer;

pub use observer::{Observer, TracingObserver};

/// Transforms a decoded message into the reply sent back on the same connection
pub type MessageHandler<S> = fn(S, Value) -> HandlerResult;

pub struct Server<State: 'static + Send + Sync> {
    state: Arc<State>,
    config: ServerConfig,
    message_handler: MessageHandler<Arc<State>>,
    observer: Arc<dyn Observer>,
    thread_counter: Arc<AtomicU64>,
}

/// A server whose socket is bound but which is not yet accepting
pub struct Listening<State: 'static + Send + Sync> {
    listener: TcpListener,
    server: Server<State>,
}

struct Worker<State> {
    state: Arc<State>,
    config: ServerConfig,
    message_handler: MessageHandler<Arc<State>>,
    observer: Arc<dyn Observer>,
}

impl<State: 'static + Send + Sync> Server<State> {
    /// Creates a server that echoes every message back and logs through `tracing`
    pub fn new(state: State, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
            message_handler: default_handlers::echo,
            observer: Arc::new(TracingObserver),
            thread_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn on_message(&mut self, handler: MessageHandler<Arc<State>>) {
        self.message_handler = handler;
    }

    pub fn observer(&mut self, observer: impl Observer + 'static) {
        self.observer = Arc::new(observer);
    }

    pub fn bind(self) -> io::Result<Listening<State>> {
        let listener = TcpListener::bind(self.config.addr)?;
        self.observer.on_listening(listener.local_addr()?);

        Ok(Listening {
            listener,
            server: self,
        })
    }

    /// Binds and serves until the listener fails
    pub fn start(self) -> io::Result<()> {
        self.bind()?.run()
    }
}

impl<State: 'static + Send + Sync> Listening<State> {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one worker thread per connection.
    ///
    /// A failed accept is reported and skipped. Only a failure to spawn a
    /// worker thread stops the loop.
    pub fn run(self) -> io::Result<()> {
        let Listening { listener, server } = self;

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    server.observer.on_accept_error(&e);
                    continue;
                }
            };

            let peer = match stream.peer_addr() {
                Ok(peer) => peer,
                Err(e) => {
                    server.observer.on_accept_error(&e);
                    continue;
                }
            };

            let worker = Worker {
                state: server.state.clone(),
                config: server.config.clone(),
                message_handler: server.message_handler,
                observer: server.observer.clone(),
            };

            let thread_id = server.thread_counter.fetch_add(1, Ordering::SeqCst);
            std::thread::Builder::new()
                .name(format!("rawws worker #{thread_id} for {peer}"))
                .spawn(move || worker.supervise(stream, peer))?;
        }

        Ok(())
    }
}

impl<State: 'static + Send + Sync> Worker<State> {
    /// Runs the connection and contains whatever goes wrong to it
    fn supervise(self, stream: TcpStream, peer: SocketAddr) {
        self.observer.on_connect(peer);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.serve(&stream, peer)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.observer.on_connection_error(peer, &e),
            Err(payload) => self
                .observer
                .on_fault(peer, &default_handlers::panic_reason(payload.as_ref())),
        }

        // the peer may already be gone
        _ = stream.shutdown(Shutdown::Both);
        self.observer.on_disconnect(peer);
    }

    fn serve(&self, stream: &TcpStream, peer: SocketAddr) -> Result<(), ConnectionError> {
        stream
            .set_read_timeout(self.config.read_timeout)
            .map_err(crate::Error::from)?;

        let mut reader = stream;
        let request = match parse_request(&mut reader) {
            Ok(request) => request,
            Err(e) => {
                _ = write_response(stream, HttpResponse::bad_request(&e));
                return Err(e.into());
            }
        };

        if !request.is_websocket_upgrade() {
            write_response(stream, default_handlers::plain(&self.config.plain_body))?;
            return Ok(());
        }

        let mut conn = match websocket_handshake(&request, stream) {
            Ok(conn) => conn,
            Err(e) => {
                _ = write_response(stream, HttpResponse::bad_request(&e));
                return Err(e.into());
            }
        };
        let key = request.headers.get(SEC_WEBSOCKET_KEY).unwrap_or_default();
        self.observer.on_upgrade(peer, key);

        loop {
            let message = match conn.recv() {
                Ok(message) => message,
                Err(websocket::Error::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            self.observer.on_message(peer, &message);

            let reply = (self.message_handler)(self.state.clone(), message)
                .map_err(ConnectionError::Handler)?;
            conn.send(&reply)?;
        }
    }
}
