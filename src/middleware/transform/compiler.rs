//! 외부 컴파일러/번들러 호출
//!
//! 번들링/전처리 알고리즘 자체는 외부 협력자입니다.
//! 여기서는 `compile(source) -> text` 계약만 다룹니다.

use std::path::Path;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::settings::Processor;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("소스 파일 접근 실패: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} 실행 실패: {message}")]
    Tool { tool: String, message: String },
}

/// 불투명한 컴파일 능력: 소스 경로를 받아 텍스트를 돌려줍니다.
#[async_trait]
pub trait Compiler: Send + Sync {
    fn name(&self) -> &str;

    async fn compile(&self, source: &Path) -> Result<String, CompileError>;
}

/// 외부 CLI 도구를 호출하는 컴파일러
///
/// 산출물은 표준 출력으로 받습니다.
pub struct CommandCompiler {
    name: &'static str,
    program: &'static str,
    args: Vec<&'static str>,
}

impl CommandCompiler {
    pub fn for_processor(processor: Processor, source_map: bool) -> Self {
        match processor {
            Processor::CommonJs => Self {
                name: "commonjs",
                program: "browserify",
                args: if source_map { vec!["--debug"] } else { vec![] },
            },
            Processor::Amd => Self {
                name: "amd",
                program: "r.js",
                args: vec!["-o"],
            },
            Processor::Sass => Self {
                name: "sass",
                program: "sass",
                args: if source_map {
                    vec!["--embed-source-map"]
                } else {
                    vec!["--no-source-map"]
                },
            },
            Processor::Less => Self {
                name: "less",
                program: "lessc",
                args: vec![],
            },
            Processor::Stylus => Self {
                name: "stylus",
                program: "stylus",
                args: vec!["-p"],
            },
        }
    }
}

#[async_trait]
impl Compiler for CommandCompiler {
    fn name(&self) -> &str {
        self.name
    }

    async fn compile(&self, source: &Path) -> Result<String, CompileError> {
        // 소스가 없으면 도구를 띄우기 전에 실패시킵니다
        tokio::fs::metadata(source).await?;

        debug!(tool = self.program, source = %source.display(), "컴파일 시작");

        let output = Command::new(self.program)
            .args(&self.args)
            .arg(source)
            .output()
            .await?;

        if !output.status.success() {
            return Err(CompileError::Tool {
                tool: self.program.to_string(),
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
