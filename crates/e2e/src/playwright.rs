//! Playwright browser automation
//!
//! A small Node driver keeps one browser page open for the whole scenario and
//! answers JSON requests, one per line, on its stdin/stdout.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::browser::BrowserSurface;
use crate::error::{E2eError, E2eResult};

const DRIVER_SCRIPT: &str = r#"
const { chromium, firefox, webkit } = require('playwright');
const readline = require('readline');

(async () => {
  const config = JSON.parse(process.argv[2]);
  const engines = { chromium, firefox, webkit };
  const browser = await engines[config.browser].launch({ headless: config.headless });
  const context = await browser.newContext({
    viewport: { width: config.viewport_width, height: config.viewport_height }
  });
  const page = await context.newPage();
  page.setDefaultTimeout(config.action_timeout_ms);

  const locate = (selector) => selector.startsWith('label=')
    ? page.getByLabel(selector.slice('label='.length), { exact: true })
    : page.locator(selector);

  const timeoutOf = (cmd) => cmd.timeout_ms ?? config.action_timeout_ms;
  const opts = (cmd) => ({ timeout: timeoutOf(cmd) });

  // Retry `check` until it holds or the request's timeout runs out
  const eventually = async (cmd, check) => {
    const deadline = Date.now() + timeoutOf(cmd);
    for (;;) {
      try {
        if (await check()) return true;
      } catch (error) {
        if (error.name !== 'TimeoutError') throw error;
      }
      if (Date.now() >= deadline) return false;
      await page.waitForTimeout(100);
    }
  };

  const handlers = {
    goto: async (cmd) => { await page.goto(cmd.value, opts(cmd)); return null; },
    click: async (cmd) => { await locate(cmd.selector).click(opts(cmd)); return null; },
    fill: async (cmd) => { await locate(cmd.selector).fill(cmd.value, opts(cmd)); return null; },
    wait_visible: async (cmd) => {
      await locate(cmd.selector).waitFor({ state: 'visible', ...opts(cmd) });
      return null;
    },
    inner_text: (cmd) => locate(cmd.selector).innerText(opts(cmd)),
    all_inner_texts: (cmd) => locate(cmd.selector).allInnerTexts(),
    direct_text: (cmd) => locate(cmd.selector).evaluate((element) => {
      const parts = [];
      for (const node of element.childNodes) {
        if (node.nodeType === Node.TEXT_NODE && node.textContent) {
          parts.push(node.textContent);
        }
      }
      return parts.join('').trim();
    }, null, opts(cmd)),
    is_visible: (cmd) => eventually(cmd, () => locate(cmd.selector).isVisible()),
    is_disabled: (cmd) => eventually(cmd, () => locate(cmd.selector).isDisabled({ timeout: 100 })),
  };

  const send = (reply) => process.stdout.write(JSON.stringify(reply) + '\n');
  send({ id: 0, ok: true, value: 'ready' });

  const lines = readline.createInterface({ input: process.stdin });
  for await (const line of lines) {
    if (!line.trim()) continue;
    const cmd = JSON.parse(line);
    if (cmd.op === 'close') break;
    try {
      const handler = handlers[cmd.op];
      if (!handler) throw new Error(`unknown op ${cmd.op}`);
      send({ id: cmd.id, ok: true, value: await handler(cmd) });
    } catch (error) {
      send({ id: cmd.id, ok: false, error: error.message });
    }
  }

  await browser.close();
  process.exit(0);
})().catch((error) => {
  console.error(error.stack || error.message);
  process.exit(1);
});
"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Default timeout for every browser action
    pub action_timeout: Duration,

    /// Timeout for the browser to launch
    pub launch_timeout: Duration,

    /// `node_modules` directory holding the `playwright` package
    pub node_modules: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            action_timeout: Duration::from_secs(5),
            launch_timeout: Duration::from_secs(30),
            node_modules: None,
        }
    }
}

/// Launch options handed to the driver script
#[derive(Debug, Serialize)]
struct DriverConfig<'a> {
    browser: &'a str,
    headless: bool,
    viewport_width: u32,
    viewport_height: u32,
    action_timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct DriverRequest<'a> {
    id: u64,
    op: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,

    /// Overrides the driver's default action timeout for this request
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DriverReply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

struct DriverIo {
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl DriverIo {
    /// Read replies until the one answering `id`
    async fn read_reply(&mut self, id: u64) -> E2eResult<DriverReply> {
        loop {
            let line = self
                .stdout
                .next_line()
                .await?
                .ok_or_else(|| E2eError::Playwright("driver exited unexpectedly".to_string()))?;

            match serde_json::from_str::<DriverReply>(&line) {
                Ok(reply) if reply.id == id => return Ok(reply),
                Ok(reply) => debug!("Ignoring stale driver reply {}", reply.id),
                Err(_) => debug!("[driver] {}", line),
            }
        }
    }
}

fn eventually_request<'a>(op: &'a str, selector: &'a str, timeout: Duration) -> DriverRequest<'a> {
    DriverRequest {
        id: 0,
        op,
        selector: Some(selector),
        value: None,
        timeout_ms: Some(timeout.as_millis() as u64),
    }
}

/// A running browser page controlled through the Node driver
pub struct PlaywrightSession {
    child: Child,
    io: Mutex<DriverIo>,
    viewport_width: u32,
    action_timeout: Duration,

    // Holds the driver script until the session ends
    _script_dir: tempfile::TempDir,
}

impl PlaywrightSession {
    /// Launch a browser with a fresh context and page
    pub async fn launch(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        let driver_config = serde_json::to_string(&DriverConfig {
            browser: config.browser.as_str(),
            headless: config.headless,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            action_timeout_ms: config.action_timeout.as_millis() as u64,
        })?;

        info!("Launching {} (headless: {})", config.browser.as_str(), config.headless);

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .arg(driver_config)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(node_modules) = &config.node_modules {
            cmd.env("NODE_PATH", node_modules);
        }

        let mut child = cmd.spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Playwright("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Playwright("driver stdout unavailable".to_string()))?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!("[driver] {}", line);
                }
            });
        }

        let mut io = DriverIo {
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 1,
        };

        tokio::time::timeout(config.launch_timeout, io.read_reply(0))
            .await
            .map_err(|_| E2eError::Timeout("browser launch".to_string()))??;

        debug!("Playwright driver ready");

        Ok(Self {
            child,
            io: Mutex::new(io),
            viewport_width: config.viewport_width,
            action_timeout: config.action_timeout,
            _script_dir: script_dir,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    async fn request(
        &self,
        op: &str,
        selector: Option<&str>,
        value: Option<&str>,
    ) -> E2eResult<serde_json::Value> {
        self.send(DriverRequest {
            id: 0,
            op,
            selector,
            value,
            timeout_ms: None,
        })
        .await
    }

    async fn send(&self, mut request: DriverRequest<'_>) -> E2eResult<serde_json::Value> {
        let (op, selector, value) = (request.op, request.selector, request.value);
        let action_timeout = request
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.action_timeout);

        let mut io = self.io.lock().await;
        let id = io.next_id;
        io.next_id += 1;
        request.id = id;

        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        // The driver enforces the action timeout itself; this only guards
        // against a wedged driver process.
        let reply = tokio::time::timeout(action_timeout * 2, io.read_reply(id))
            .await
            .map_err(|_| E2eError::Timeout(format!("{} {}", op, selector.unwrap_or_default())))??;

        if reply.ok {
            Ok(reply.value)
        } else {
            Err(E2eError::Driver {
                op: op.to_string(),
                selector: selector.or(value).unwrap_or_default().to_string(),
                reason: reply.error.unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }

    async fn request_as<T: DeserializeOwned>(&self, op: &str, selector: &str) -> E2eResult<T> {
        let value = self.request(op, Some(selector), None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// A state check the driver retries for the whole action timeout
    async fn request_eventually(&self, op: &str, selector: &str) -> E2eResult<bool> {
        let value = self
            .send(eventually_request(op, selector, self.action_timeout))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Close the browser and wait for the driver to exit
    pub async fn close(mut self) -> E2eResult<()> {
        {
            let mut io = self.io.lock().await;
            let _ = io.stdin.write_all(b"{\"op\":\"close\"}\n").await;
            let _ = io.stdin.flush().await;
        }

        match tokio::time::timeout(Duration::from_secs(5), self.child.wait()).await {
            Ok(status) => {
                debug!("Playwright driver exited: {:?}", status?);
            }
            Err(_) => {
                warn!("Playwright driver did not exit, killing it");
                self.child.kill().await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl BrowserSurface for PlaywrightSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        self.request("goto", None, Some(url)).await.map(|_| ())
    }

    async fn click(&self, selector: &str) -> E2eResult<()> {
        debug!("click {}", selector);
        self.request("click", Some(selector), None).await.map(|_| ())
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        debug!("fill {}", selector);
        self.request("fill", Some(selector), Some(value)).await.map(|_| ())
    }

    async fn wait_visible(&self, selector: &str) -> E2eResult<()> {
        self.request("wait_visible", Some(selector), None).await.map(|_| ())
    }

    async fn inner_text(&self, selector: &str) -> E2eResult<String> {
        self.request_as("inner_text", selector).await
    }

    async fn all_inner_texts(&self, selector: &str) -> E2eResult<Vec<String>> {
        self.request_as("all_inner_texts", selector).await
    }

    async fn direct_text(&self, selector: &str) -> E2eResult<String> {
        self.request_as("direct_text", selector).await
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        self.request_eventually("is_visible", selector).await
    }

    async fn is_disabled(&self, selector: &str) -> E2eResult<bool> {
        self.request_eventually("is_disabled", selector).await
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}
