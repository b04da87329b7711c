#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// 每個階段結束時記錄 CPU / 記憶體 / 經過時間
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    peak_memory_mb: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid().ok()
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            start_time: Instant::now(),
            peak_memory_mb: Mutex::new(0),
            enabled,
        }
    }

    pub fn log_stats(&self, phase: &str) {
        if !self.enabled {
            return;
        }
        let Some(pid) = self.pid else {
            return;
        };
        let Ok(mut system) = self.system.lock() else {
            return;
        };

        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let Some(process) = system.process(pid) else {
            return;
        };

        let memory_mb = process.memory() / 1024 / 1024;
        let peak = match self.peak_memory_mb.lock() {
            Ok(mut peak) => {
                *peak = (*peak).max(memory_mb);
                *peak
            }
            Err(_) => memory_mb,
        };

        tracing::info!(
            phase,
            cpu = process.cpu_usage(),
            memory_mb,
            peak_memory_mb = peak,
            elapsed = ?self.start_time.elapsed(),
            "📊 phase finished"
        );
    }

    pub fn log_final_stats(&self) {
        if self.enabled {
            let peak = self.peak_memory_mb.lock().map(|p| *p).unwrap_or(0);
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.start_time.elapsed(),
                peak
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
