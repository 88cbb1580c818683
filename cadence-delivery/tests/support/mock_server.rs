//! Mock submission server for delivery tests
#![allow(dead_code)] // Test utility module - not all methods used in every test
//!
//! The server accepts any number of connections and can:
//! - Answer each command with a configured reply
//! - Walk AUTH LOGIN through its username/password challenges
//! - Hang up on the first N connections, or after N commands
//! - Record every command and message body for verification

use std::{
    fmt::Write,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::RwLock,
    task::JoinHandle,
};

/// SMTP command received by the mock server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpCommand {
    Ehlo(String),
    /// The mechanism named on the AUTH line
    Auth(String),
    MailFrom(String),
    RcptTo(String),
    Data,
    /// Message content (after DATA), dot-stuffing intact
    MessageContent(String),
    Quit,
    Other(String),
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub code: u16,
    pub message: String,
}

impl Reply {
    fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        format!("{} {}\r\n", self.code, self.message).into_bytes()
    }
}

#[derive(Clone)]
struct MockServerConfig {
    greeting: Reply,
    capabilities: Vec<String>,
    auth: Reply,
    mail_from: Reply,
    rcpt_to: Reply,
    data: Reply,
    data_end: Reply,
    quit: Reply,

    // Failure injection
    refuse_connections: usize,
    drop_after_commands: Option<usize>,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            greeting: Reply::new(220, "mock.local ESMTP"),
            capabilities: vec![
                "mock.local".to_string(),
                "AUTH PLAIN LOGIN".to_string(),
                "SIZE 10000000".to_string(),
            ],
            auth: Reply::new(235, "2.7.0 Authentication successful"),
            mail_from: Reply::new(250, "OK"),
            rcpt_to: Reply::new(250, "OK"),
            data: Reply::new(354, "End data with <CR><LF>.<CR><LF>"),
            data_end: Reply::new(250, "2.0.0 Ok: queued"),
            quit: Reply::new(221, "Bye"),
            refuse_connections: 0,
            drop_after_commands: None,
        }
    }
}

impl MockServerConfig {
    fn ehlo_bytes(&self) -> Vec<u8> {
        let mut response = String::new();
        let last = self.capabilities.len().saturating_sub(1);

        for (i, capability) in self.capabilities.iter().enumerate() {
            let separator = if i < last { '-' } else { ' ' };
            let _ = write!(&mut response, "250{separator}{capability}\r\n");
        }

        response.into_bytes()
    }
}

#[derive(Default)]
struct State {
    commands: RwLock<Vec<SmtpCommand>>,
    connections: AtomicUsize,
}

pub struct MockSmtpServer {
    addr: SocketAddr,
    state: Arc<State>,
    task: JoinHandle<()>,
}

impl MockSmtpServer {
    #[must_use]
    pub fn builder() -> MockSmtpServerBuilder {
        MockSmtpServerBuilder {
            config: MockServerConfig::default(),
        }
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn commands(&self) -> Vec<SmtpCommand> {
        self.state.commands.read().await.clone()
    }

    /// Message bodies received, in order.
    pub async fn messages(&self) -> Vec<String> {
        self.commands()
            .await
            .into_iter()
            .filter_map(|command| match command {
                SmtpCommand::MessageContent(content) => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Connections accepted so far, including refused ones.
    #[must_use]
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }

    async fn handle_client(
        stream: TcpStream,
        config: Arc<MockServerConfig>,
        state: Arc<State>,
    ) -> std::io::Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut handled = 0;

        writer.write_all(&config.greeting.to_bytes()).await?;

        loop {
            if config.drop_after_commands.is_some_and(|limit| handled >= limit) {
                return Ok(());
            }

            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            handled += 1;

            let line = line.trim_end();
            let (verb, argument) = line.split_once(' ').unwrap_or((line, ""));

            let (reply, command) = match verb.to_ascii_uppercase().as_str() {
                "EHLO" => (config.ehlo_bytes(), SmtpCommand::Ehlo(argument.to_string())),
                "AUTH" => {
                    let mechanism = argument
                        .split_whitespace()
                        .next()
                        .unwrap_or_default()
                        .to_ascii_uppercase();

                    if mechanism == "LOGIN" && config.auth.code == 235 {
                        for prompt in ["VXNlcm5hbWU6", "UGFzc3dvcmQ6"] {
                            writer.write_all(format!("334 {prompt}\r\n").as_bytes()).await?;
                            let mut answer = String::new();
                            reader.read_line(&mut answer).await?;
                        }
                    }

                    (config.auth.to_bytes(), SmtpCommand::Auth(mechanism))
                }
                "MAIL" => (
                    config.mail_from.to_bytes(),
                    SmtpCommand::MailFrom(argument.to_string()),
                ),
                "RCPT" => (
                    config.rcpt_to.to_bytes(),
                    SmtpCommand::RcptTo(argument.to_string()),
                ),
                "DATA" => (config.data.to_bytes(), SmtpCommand::Data),
                "QUIT" => {
                    state.commands.write().await.push(SmtpCommand::Quit);
                    writer.write_all(&config.quit.to_bytes()).await?;
                    return Ok(());
                }
                _ => (
                    Reply::new(500, "Unknown command").to_bytes(),
                    SmtpCommand::Other(line.to_string()),
                ),
            };

            let is_data = command == SmtpCommand::Data;
            state.commands.write().await.push(command);
            writer.write_all(&reply).await?;

            if is_data && config.data.code == 354 {
                let mut content = String::new();

                loop {
                    let mut data_line = String::new();
                    if reader.read_line(&mut data_line).await? == 0 {
                        return Ok(());
                    }
                    if data_line.trim_end() == "." {
                        break;
                    }
                    content.push_str(&data_line);
                }

                state
                    .commands
                    .write()
                    .await
                    .push(SmtpCommand::MessageContent(content));
                writer.write_all(&config.data_end.to_bytes()).await?;
            }
        }
    }
}

impl Drop for MockSmtpServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct MockSmtpServerBuilder {
    config: MockServerConfig,
}

impl MockSmtpServerBuilder {
    /// Replace the advertised EHLO lines (the first is the greeting line).
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: &[&str]) -> Self {
        self.config.capabilities = capabilities.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_auth_response(mut self, code: u16, message: impl Into<String>) -> Self {
        self.config.auth = Reply::new(code, message);
        self
    }

    #[must_use]
    pub fn with_mail_from_response(mut self, code: u16, message: impl Into<String>) -> Self {
        self.config.mail_from = Reply::new(code, message);
        self
    }

    #[must_use]
    pub fn with_rcpt_to_response(mut self, code: u16, message: impl Into<String>) -> Self {
        self.config.rcpt_to = Reply::new(code, message);
        self
    }

    #[must_use]
    pub fn with_data_end_response(mut self, code: u16, message: impl Into<String>) -> Self {
        self.config.data_end = Reply::new(code, message);
        self
    }

    /// Hang up on the first `count` connections before the greeting.
    #[must_use]
    pub const fn refusing_first(mut self, count: usize) -> Self {
        self.config.refuse_connections = count;
        self
    }

    /// Drop every connection after `count` commands.
    #[must_use]
    pub const fn with_network_error_after_commands(mut self, count: usize) -> Self {
        self.config.drop_after_commands = Some(count);
        self
    }

    /// Bind to a random local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to a port
    pub async fn build(self) -> Result<MockSmtpServer, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = Arc::new(self.config);
        let state = Arc::new(State::default());
        let server_state = Arc::clone(&state);

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let seen = server_state.connections.fetch_add(1, Ordering::SeqCst);
                if seen < config.refuse_connections {
                    drop(stream);
                    continue;
                }

                let config = Arc::clone(&config);
                let state = Arc::clone(&server_state);
                tokio::spawn(async move {
                    let _ = MockSmtpServer::handle_client(stream, config, state).await;
                });
            }
        });

        Ok(MockSmtpServer { addr, state, task })
    }
}
