//! 외부 압축기 호출
//!
//! 컴파일과 마찬가지로 압축 알고리즘은 외부 협력자입니다.
//! 표준 입력으로 내용을 주고 표준 출력으로 결과를 받습니다.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::settings::ResourceKind;
use super::compiler::CompileError;

/// 불투명한 압축 능력
#[async_trait]
pub trait Minifier: Send + Sync {
    fn name(&self) -> &str;

    async fn minify(&self, content: String) -> Result<String, CompileError>;
}

/// 외부 CLI 압축기
pub struct CommandMinifier {
    name: &'static str,
    program: &'static str,
    args: Vec<&'static str>,
}

impl CommandMinifier {
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Scripts => Self {
                name: "uglify",
                program: "uglifyjs",
                args: vec!["--compress", "--mangle"],
            },
            ResourceKind::Stylesheets => Self {
                name: "cleancss",
                program: "cleancss",
                args: vec![],
            },
        }
    }
}

#[async_trait]
impl Minifier for CommandMinifier {
    fn name(&self) -> &str {
        self.name
    }

    async fn minify(&self, content: String) -> Result<String, CompileError> {
        let mut child = Command::new(self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(content.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(CompileError::Tool {
                tool: self.program.to_string(),
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
