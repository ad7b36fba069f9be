// Mon Feb 16 2026 - Alex

pub const MAIN_TARGET: &str = "<main target>";

const DYLIB_STUB_EXTENSIONS: [&str; 2] = [".dylib", ".tbd"];

/// Derives the owning library of an object file path.
///
/// - `/x/Foo.framework/Foo` and anything below a `.framework/` → `Foo`
/// - `/x/libBar.a(baz.o)` → `libBar`
/// - `/usr/lib/libz.1.tbd` → `libz.1`
/// - everything else is compiled into the main target
pub fn library_key(path: &str) -> String {
    if let Some(name) = framework_name(path) {
        return name.to_string();
    }

    if let Some((archive, _member)) = split_archive_member(path) {
        return strip_extension(file_name(archive)).to_string();
    }

    for ext in DYLIB_STUB_EXTENSIONS {
        if let Some(stem) = file_name(path).strip_suffix(ext) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }

    MAIN_TARGET.to_string()
}

/// Splits `archive.a(member.o)` into its archive path and member name.
pub fn split_archive_member(path: &str) -> Option<(&str, &str)> {
    let path = path.trim_end();
    let inner = path.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let archive = &inner[..open];
    let member = &inner[open + 1..];

    if archive.is_empty() || member.is_empty() {
        return None;
    }

    Some((archive, member))
}

pub fn framework_name(path: &str) -> Option<&str> {
    let idx = path.find(".framework/")?;
    let before = &path[..idx];
    let name = match before.rfind('/') {
        Some(slash) => &before[slash + 1..],
        None => before,
    };

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
