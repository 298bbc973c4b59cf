//! Subcommand handlers.
//!
//! Each handler returns the text to print so the binary stays a thin shell
//! around [`App::run`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use taskly_client::{ServerClient, url_to_file};
use taskly_core::upload::guess_image_type;
use taskly_core::{FileUpload, Task, TaskForm, TaskId, TaskStatus, is_accepted_photo_type};
use taskly_settings::TasklySettings;
use taskly_store::TaskStore;
use tracing::{debug, warn};

use crate::cli::{Command, CreateArgs, EditArgs};
use crate::render;

/// Session state shared by every subcommand.
pub struct App {
    settings: TasklySettings,
    client: ServerClient,
    store: TaskStore,
    color: bool,
}

impl App {
    /// Build the client and an empty store.
    pub fn new(settings: TasklySettings, color: bool) -> Result<Self> {
        let client = ServerClient::new(settings.server.base_url.clone())
            .context("Failed to build HTTP client")?;
        let store = TaskStore::with_client(client.clone());
        Ok(Self {
            settings,
            client,
            store,
            color,
        })
    }

    /// Run one subcommand.
    pub async fn run(&self, command: Command) -> Result<String> {
        match command {
            Command::List { status } => self.list(status).await,
            Command::Show { id } => self.show(&TaskId::from(id)).await,
            Command::Create(args) => self.create(args).await,
            Command::Edit(args) => self.edit(args).await,
            Command::Status { id, status } => self.set_status(&TaskId::from(id), status).await,
            Command::Delete { id } => self.delete(&TaskId::from(id)).await,
            Command::Photo { id, output } => self.photo(&TaskId::from(id), output).await,
        }
    }

    async fn list(&self, status: Option<TaskStatus>) -> Result<String> {
        let _ = self
            .store
            .fetch_tasks()
            .await
            .into_result()
            .context("Failed to fetch tasks")?;
        let tasks = match status {
            Some(status) => self.store.tasks_with_status(status),
            None => self.store.tasks(),
        };
        Ok(render::task_table(&tasks, today(), self.color))
    }

    async fn show(&self, id: &TaskId) -> Result<String> {
        let task = self.require(id).await?;
        let photo_url = task.photo.as_deref().map(|p| self.absolute(p));
        Ok(render::task_detail(
            &task,
            photo_url.as_deref(),
            today(),
            self.color,
        ))
    }

    async fn create(&self, args: CreateArgs) -> Result<String> {
        let form = TaskForm {
            title: args.title,
            description: args.description,
            due_date: args.due,
            status: args.status,
            photo: args.photo.as_deref().map(read_photo).transpose()?,
        };
        form.validate(today())?;

        let task = self.store.create_task(&form).await?;
        Ok(format!("Created\n{}", render::task_line(&task, today(), self.color)))
    }

    async fn edit(&self, args: EditArgs) -> Result<String> {
        let id = TaskId::from(args.id);
        let current = self.require(&id).await?;

        let mut form = TaskForm::from_task(&current);
        if let Some(title) = args.title {
            form.title = title;
        }
        if let Some(description) = args.description {
            form.description = description;
        }
        if args.clear_due {
            form.due_date = None;
        } else if let Some(due) = args.due {
            form.due_date = Some(due);
        }
        if let Some(status) = args.status {
            form.status = status;
        }
        form.photo = match args.photo {
            Some(path) => Some(read_photo(&path)?),
            None => self.current_photo(&current).await,
        };
        form.validate_edit(today(), current.due_day())?;

        let task = self.store.update_task(&id, &form).await?;
        Ok(format!("Updated\n{}", render::task_line(&task, today(), self.color)))
    }

    async fn set_status(&self, id: &TaskId, status: TaskStatus) -> Result<String> {
        let _ = self.require(id).await?;
        let task = self
            .store
            .update_task_status(id, status)
            .await
            .into_result()
            .with_context(|| format!("Failed to set status of task {id}"))?;
        Ok(render::task_line(&task, today(), self.color))
    }

    async fn delete(&self, id: &TaskId) -> Result<String> {
        self.store
            .delete_task(id)
            .await
            .into_result()
            .with_context(|| format!("Failed to delete task {id}"))?;
        Ok(format!("Deleted task {id}"))
    }

    async fn photo(&self, id: &TaskId, output: Option<PathBuf>) -> Result<String> {
        let task = self.require(id).await?;
        let url = task
            .photo
            .as_deref()
            .with_context(|| format!("Task {id} has no photo"))?;
        let file = url_to_file(&self.client, url, Some(self.fallback_name()))
            .await
            .with_context(|| format!("Failed to download {}", self.absolute(url)))?;

        let path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
        std::fs::write(&path, &file.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(format!("Saved {} ({} bytes)", path.display(), file.len()))
    }

    /// Hydrate the store once and look up `id`.
    async fn require(&self, id: &TaskId) -> Result<Task> {
        if self.store.initialize().await {
            debug!(count = self.store.len(), "task list loaded");
        }
        self.store
            .get(id)
            .with_context(|| format!("Task {id} not found"))
    }

    /// Re-download the task's existing photo so an update keeps it.
    ///
    /// A content type the upload rules reject (servers often answer
    /// `application/octet-stream`) is replaced by a guess from the file name.
    async fn current_photo(&self, task: &Task) -> Option<FileUpload> {
        let url = task.photo.as_deref()?;
        let Some(mut file) = url_to_file(&self.client, url, Some(self.fallback_name())).await
        else {
            warn!(id = %task.id, "current photo unavailable, updating without it");
            return None;
        };
        if !is_accepted_photo_type(&file.content_type) {
            if let Some(guessed) = guess_image_type(&file.file_name) {
                debug!(served = %file.content_type, guessed, "replacing photo content type");
                guessed.clone_into(&mut file.content_type);
            }
        }
        Some(file)
    }

    fn fallback_name(&self) -> &str {
        &self.settings.upload.fallback_file_name
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with('/') {
            self.client.endpoint(url)
        } else {
            url.to_owned()
        }
    }
}

fn read_photo(path: &Path) -> Result<FileUpload> {
    FileUpload::from_path(path).with_context(|| format!("Failed to read photo {}", path.display()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
