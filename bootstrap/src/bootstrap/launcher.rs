use crate::utils::cli::Target;
use crate::utils::logging::*;
use async_ctrlc::CtrlC;
use futures::future::select_all;
use std::env;
use std::path::PathBuf;
use tokio::process::{Child, Command as AsyncCommand};
use tokio::select;

pub struct Launcher;

impl Launcher {
    /// Server binaries are expected next to the running executable.
    pub fn binary_path(name: &str) -> Result<PathBuf, SystemEntry> {
        let current = env::current_exe().map_err(|err| SystemEntry::ChildProcessError(err.to_string()))?;
        Ok(current.with_file_name(format!("{}{}", name, env::consts::EXE_SUFFIX)))
    }

    /// Runs until Ctrl-C or until any child exits, then stops the rest.
    pub async fn start(target: Target) -> Result<(), SystemEntry> {
        let ctrlc = CtrlC::new().map_err(|err| SystemEntry::ChildProcessError(err.to_string()))?;
        let mut children = Vec::new();
        for name in target.binaries() {
            match Self::spawn(name) {
                Ok(child) => {
                    logging_information!(SystemEntry::ChildProcessStarted(name.to_string()));
                    children.push((*name, child));
                }
                Err(entry) => {
                    Self::stop(&mut children).await;
                    return Err(entry);
                }
            }
        }

        let exited = {
            let waits = children.iter_mut().map(|(_, child)| Box::pin(child.wait()));
            select! {
                _ = ctrlc => None,
                (status, index, _) = select_all(waits) => Some((index, status)),
            }
        };
        if let Some((index, status)) = exited {
            let name = children[index].0;
            match status {
                Ok(status) if status.success() => logging_notice!(SystemEntry::ChildProcessExited(name.to_string())),
                Ok(status) => logging_error!(SystemEntry::ChildProcessError(format!("{} exited with {}", name, status))),
                Err(err) => logging_error!(SystemEntry::ChildProcessError(format!("{}: {}", name, err))),
            }
        }
        Self::stop(&mut children).await;
        Ok(())
    }

    fn spawn(name: &str) -> Result<Child, SystemEntry> {
        let path = Self::binary_path(name)?;
        let child = AsyncCommand::new(&path)
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| SystemEntry::ChildProcessError(format!("{}: {}", path.display(), err)))?;
        Ok(child)
    }

    async fn stop(children: &mut [(&str, Child)]) {
        for (name, child) in children.iter_mut() {
            if let Ok(Some(_)) = child.try_wait() {
                continue;
            }
            if let Err(err) = child.kill().await {
                logging_error!(SystemEntry::ChildProcessError(format!("{}: {}", name, err)));
            }
        }
    }
}
