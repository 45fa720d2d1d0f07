use std::path::{Path, PathBuf};
use anyhow::{Result, bail};
use log::debug;

use crate::catalog::TypeDescriptor;
use crate::config::is_valid_path_component;
use crate::utils::{file_utils, hash_utils};
use super::render::{render_class, RenderOptions};
use super::types::WrittenStub;

/// Target path of a class stub: `<output_root>/<namespace>/<class_name>.<extension>`
pub fn stub_path(output_root: &Path, namespace: &str, class_name: &str, extension: &str) -> Result<PathBuf> {
    if !is_valid_path_component(namespace) {
        bail!("Namespace '{}' is not a valid directory name", namespace);
    }
    if !is_valid_path_component(class_name) {
        bail!("Class name '{}' is not a valid file name", class_name);
    }

    Ok(output_root.join(namespace).join(format!("{}.{}", class_name, extension)))
}

/// Render a class stub and write it to its file under `output_root`.
///
/// The namespace directory is created when missing and any existing file is
/// overwritten.
pub fn render_and_write(
    class: &TypeDescriptor,
    namespace: &str,
    output_root: &Path,
    extension: &str,
    options: &RenderOptions,
) -> Result<WrittenStub> {
    let path = stub_path(output_root, namespace, &class.name, extension)?;

    file_utils::ensure_dir_exists(output_root.join(namespace))?;

    let (content, members) = render_class(class, namespace, options);
    file_utils::write_string_to_file(&path, &content)?;
    debug!("Wrote {} ({} bytes)", path.display(), content.len());

    Ok(WrittenStub {
        namespace: namespace.to_string(),
        class_name: class.name.clone(),
        path,
        sha256: hash_utils::hash_string(&content),
        members,
    })
}
