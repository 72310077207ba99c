// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Compiled-asset json conversion and safe filesystem access confined to the store root.

#[derive(Debug, Serialize, Deserialize)]
struct GroupAssetJson {
    group_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DialogueContainerJson {
    file_name: String,
    #[serde(default)]
    group_names: Vec<String>,
    #[serde(default)]
    ungrouped_dialogues: Vec<String>,
    #[serde(default)]
    grouped_dialogues: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DialogueRecordJson {
    name: String,
    text: String,
    kind: DialogueKindJson,
    is_starting_dialogue: bool,
    choices: Vec<CompiledChoiceJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompiledChoiceJson {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_dialogue: Option<RecordRefJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordRefJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
}

fn dialogue_container_to_json(container: &DialogueContainer) -> DialogueContainerJson {
    DialogueContainerJson {
        file_name: container.file_name.clone(),
        group_names: container.group_names.iter().cloned().collect(),
        ungrouped_dialogues: container.ungrouped_dialogues.iter().cloned().collect(),
        grouped_dialogues: container
            .grouped_dialogues
            .iter()
            .map(|(group_name, names)| (group_name.clone(), names.iter().cloned().collect()))
            .collect(),
    }
}

/// Names listed in a container become paths, so each must be a sanitized name.
fn dialogue_container_from_json(
    container_json: DialogueContainerJson,
) -> Result<DialogueContainer, StoreError> {
    validate_name_segment("container.file_name", &container_json.file_name)?;
    for group_name in &container_json.group_names {
        validate_name_segment("container.group_names[]", group_name)?;
    }
    for name in &container_json.ungrouped_dialogues {
        validate_name_segment("container.ungrouped_dialogues[]", name)?;
    }

    let mut grouped_dialogues = BTreeMap::<String, BTreeSet<String>>::new();
    for (group_name, names) in container_json.grouped_dialogues {
        validate_name_segment("container.grouped_dialogues", &group_name)?;
        for name in &names {
            validate_name_segment("container.grouped_dialogues[]", name)?;
        }
        grouped_dialogues.entry(group_name).or_default().extend(names);
    }

    Ok(DialogueContainer {
        file_name: container_json.file_name,
        group_names: container_json.group_names.into_iter().collect(),
        ungrouped_dialogues: container_json.ungrouped_dialogues.into_iter().collect(),
        grouped_dialogues,
    })
}

fn dialogue_record_to_json(record: &DialogueRecord) -> DialogueRecordJson {
    DialogueRecordJson {
        name: record.name.clone(),
        text: record.text.clone(),
        kind: record.kind.into(),
        is_starting_dialogue: record.is_starting_dialogue,
        choices: record
            .choices
            .iter()
            .map(|choice| CompiledChoiceJson {
                text: choice.text.clone(),
                next_dialogue: choice.next_dialogue.as_ref().map(|next| RecordRefJson {
                    group: next.group().map(ToOwned::to_owned),
                    name: next.name().to_owned(),
                }),
            })
            .collect(),
    }
}

fn dialogue_record_from_json(record_json: DialogueRecordJson) -> DialogueRecord {
    DialogueRecord {
        name: record_json.name,
        text: record_json.text,
        kind: record_json.kind.into(),
        is_starting_dialogue: record_json.is_starting_dialogue,
        choices: record_json
            .choices
            .into_iter()
            .map(|choice| CompiledChoice {
                text: choice.text,
                next_dialogue: choice.next_dialogue.map(|next| match next.group {
                    Some(group) => RecordRef::grouped(group, next.name),
                    None => RecordRef::ungrouped(next.name),
                }),
            })
            .collect(),
    }
}

fn validate_relative_path(root: &Path, path: &Path) -> Result<(), StoreError> {
    let outside = || StoreError::PathOutsideStore {
        root: root.to_path_buf(),
        path: path.to_path_buf(),
    };

    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(outside());
    }

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(outside());
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

fn to_relative_path(root: &Path, path: &Path) -> Result<PathBuf, StoreError> {
    let relative = if path.is_absolute() {
        path.strip_prefix(root)
            .map(PathBuf::from)
            .map_err(|_| StoreError::PathOutsideStore {
                root: root.to_path_buf(),
                path: path.to_path_buf(),
            })?
    } else {
        path.strip_prefix(root).map(PathBuf::from).unwrap_or_else(|_| path.to_path_buf())
    };

    validate_relative_path(root, &relative)?;
    Ok(relative)
}

fn create_dir_all_safe(root: &Path, relative: &Path) -> Result<(), StoreError> {
    if relative.as_os_str().is_empty() {
        return Ok(());
    }

    validate_relative_path(root, relative)?;

    let mut current = root.to_path_buf();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };

        current.push(part);

        match fs::symlink_metadata(&current) {
            Ok(md) => {
                if md.file_type().is_symlink() {
                    return Err(StoreError::SymlinkRefused { path: current });
                }
                if !md.is_dir() {
                    return Err(StoreError::Io {
                        path: current,
                        source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
                    });
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|source| StoreError::Io {
                    path: current.clone(),
                    source,
                })?;
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: current,
                    source,
                })
            }
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` unless the file already holds exactly those bytes.
fn write_if_changed(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<WriteOutcome, StoreError> {
    let outcome = match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {
            let existing = fs::read(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if existing == contents {
                return Ok(WriteOutcome::Unchanged);
            }
            WriteOutcome::Updated
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => WriteOutcome::Created,
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    write_atomic_in_store(root, path, contents, durability)?;
    Ok(outcome)
}

fn write_atomic_in_store(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let relative = to_relative_path(root, path)?;
    let parent_rel = relative.parent().unwrap_or_else(|| Path::new(""));
    create_dir_all_safe(root, parent_rel)?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".dialogue-graph.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

/// Deletes a stale artifact file. Returns `false` when it was already gone.
fn remove_file_in_store(root: &Path, path: &Path) -> Result<bool, StoreError> {
    to_relative_path(root, path)?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => Err(StoreError::SymlinkRefused {
            path: path.to_path_buf(),
        }),
        Ok(_) => fs::remove_file(path).map(|()| true).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Deletes a stale artifact folder with everything inside. Returns `false` when it was
/// already gone.
fn remove_dir_in_store(root: &Path, path: &Path) -> Result<bool, StoreError> {
    to_relative_path(root, path)?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => Err(StoreError::SymlinkRefused {
            path: path.to_path_buf(),
        }),
        Ok(md) if md.is_dir() => fs::remove_dir_all(path).map(|()| true).map_err(|source| {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }),
        Ok(_) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
