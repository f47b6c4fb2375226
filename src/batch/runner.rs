//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/validate.rs`, `commands/export.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{QmtError, Result};
use crate::utils::{output, progress};

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（如文件已存在、种类不支持）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
    /// 跳过原因
    pub skips: Vec<String>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(reason) => {
                self.skipped += 1;
                self.skips.push(reason);
            }
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }

    /// 打印统计与前若干条失败详情
    pub fn report(&self, limit: usize) {
        output::print_separator();
        output::print_success(&format!(
            "Batch complete: {} success, {} skipped, {} failed",
            self.success, self.skipped, self.failed
        ));
        for reason in self.skips.iter().take(limit) {
            output::print_skip(reason);
        }
        if !self.failures.is_empty() {
            output::print_warning("Failed files:");
            for (path, err) in self.failures.iter().take(limit) {
                output::print_error(&format!("  {}: {}", path, err));
            }
            if self.failures.len() > limit {
                output::print_warning(&format!("  ... and {} more", self.failures.len() - limit));
            }
        }
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 进度条文字
    message: String,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            message: "Processing".to_string(),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理文件列表；结果顺序与输入一致
    pub fn run<F>(&self, files: Vec<PathBuf>, processor: F) -> Result<BatchResult>
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, &self.message);

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| QmtError::Other(format!("Failed to build thread pool: {}", e)))?;
        log::debug!("running {} files on {} threads", files.len(), self.jobs);

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_counts_results() {
        let files: Vec<PathBuf> = (0..12).map(|i| PathBuf::from(format!("f{}.qmt", i))).collect();
        let result = BatchRunner::new(3)
            .run(files, |f| {
                let name = f.display().to_string();
                if name.starts_with("f1") {
                    ProcessResult::Failed(name, "bad".to_string())
                } else if name == "f2.qmt" {
                    ProcessResult::Skipped(name)
                } else {
                    ProcessResult::Success(name)
                }
            })
            .unwrap();
        assert_eq!(result.total(), 12);
        // f1, f10, f11
        assert_eq!(result.failed, 3);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.skips, ["f2.qmt"]);
        assert_eq!(result.failures[0].0, "f1.qmt");
    }

    #[test]
    fn test_runner_auto_jobs() {
        assert!(BatchRunner::new(0).jobs() >= 1);
        assert_eq!(BatchRunner::new(4).jobs(), 4);
    }
}
