// Tue Feb 17 2026 - Alex

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

/// Turns a mangled symbol name into something readable. Only used when
/// rendering; parsing and aggregation always work on the raw names.
pub trait Demangle: Send + Sync {
    fn demangle(&self, mangled: &str) -> Option<String>;
}

impl<F> Demangle for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn demangle(&self, mangled: &str) -> Option<String> {
        self(mangled)
    }
}

pub struct Passthrough;

impl Demangle for Passthrough {
    fn demangle(&self, _mangled: &str) -> Option<String> {
        None
    }
}

/// Best-effort `_Z` / `__Z` demangler. Yields the qualified name only.
pub struct ItaniumDemangler;

impl Demangle for ItaniumDemangler {
    fn demangle(&self, mangled: &str) -> Option<String> {
        demangle_itanium(mangled)
    }
}

/// Name to show for `mangled`. Falls back to the raw name when there is no
/// demangler, it declines, or it panics.
pub fn display_name<'a>(demangler: Option<&dyn Demangle>, mangled: &'a str) -> Cow<'a, str> {
    let Some(demangler) = demangler else {
        return Cow::Borrowed(mangled);
    };

    match panic::catch_unwind(AssertUnwindSafe(|| demangler.demangle(mangled))) {
        Ok(Some(name)) if !name.is_empty() => Cow::Owned(name),
        _ => Cow::Borrowed(mangled),
    }
}

pub fn demangle_itanium(mangled: &str) -> Option<String> {
    let body = mangled
        .strip_prefix("__Z")
        .or_else(|| mangled.strip_prefix("_Z"))?;

    let mut reader = ItaniumReader {
        input: body.as_bytes(),
        pos: 0,
        substitutions: Vec::new(),
    };
    reader.name()
}

struct ItaniumReader<'a> {
    input: &'a [u8],
    pos: usize,
    substitutions: Vec<String>,
}

impl<'a> ItaniumReader<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn name(&mut self) -> Option<String> {
        if self.peek()? == b'L' {
            self.pos += 1;
        }

        match self.peek()? {
            b'N' => {
                self.pos += 1;
                self.nested_name()
            }
            b'S' => {
                self.pos += 1;
                let prefix = self.substitution()?;
                let name = self.source_name()?;
                Some(format!("{}::{}", prefix, name))
            }
            b'0'..=b'9' => self.source_name(),
            _ => None,
        }
    }

    fn nested_name(&mut self) -> Option<String> {
        while matches!(self.peek()?, b'r' | b'V' | b'K') {
            self.pos += 1;
        }

        let mut parts: Vec<String> = Vec::new();
        loop {
            match self.peek()? {
                b'E' => {
                    self.pos += 1;
                    break;
                }
                b'0'..=b'9' => {
                    let part = self.source_name()?;
                    parts.push(part);
                }
                b'S' => {
                    self.pos += 1;
                    let part = self.substitution()?;
                    parts.push(part);
                }
                b'C' => {
                    self.pos += 1;
                    self.bump()?;
                    let class = last_component(&parts)?;
                    parts.push(class);
                    continue;
                }
                b'D' => {
                    self.pos += 1;
                    self.bump()?;
                    let class = last_component(&parts)?;
                    parts.push(format!("~{}", class));
                    continue;
                }
                b'I' => {
                    self.skip_template_args()?;
                    parts.last_mut()?.push_str("<...>");
                }
                _ => return None,
            }
            self.substitutions.push(parts.join("::"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("::"))
        }
    }

    fn source_name(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let len: usize = std::str::from_utf8(&self.input[start..self.pos]).ok()?.parse().ok()?;
        let end = self.pos.checked_add(len)?;
        let name = std::str::from_utf8(self.input.get(self.pos..end)?).ok()?;
        self.pos = end;
        Some(name.to_string())
    }

    fn substitution(&mut self) -> Option<String> {
        let known = match self.peek()? {
            b't' => Some("std"),
            b'a' => Some("std::allocator"),
            b'b' => Some("std::basic_string"),
            b's' => Some("std::string"),
            b'i' => Some("std::istream"),
            b'o' => Some("std::ostream"),
            b'd' => Some("std::iostream"),
            _ => None,
        };
        if let Some(name) = known {
            self.pos += 1;
            return Some(name.to_string());
        }

        let mut seq = 0usize;
        let mut indexed = false;
        loop {
            let c = self.bump()?;
            match c {
                b'_' => break,
                b'0'..=b'9' => seq = seq.checked_mul(36)?.checked_add((c - b'0') as usize)?,
                b'A'..=b'Z' => seq = seq.checked_mul(36)?.checked_add((c - b'A') as usize + 10)?,
                _ => return None,
            }
            indexed = true;
        }
        let slot = if indexed { seq.checked_add(1)? } else { 0 };
        self.substitutions.get(slot).cloned()
    }

    fn skip_template_args(&mut self) -> Option<()> {
        self.pos += 1;
        let mut depth = 1;
        while depth > 0 {
            match self.peek()? {
                b'0'..=b'9' => {
                    self.source_name()?;
                }
                b'L' => {
                    while self.bump()? != b'E' {}
                }
                b'I' | b'N' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'E' => {
                    depth -= 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Some(())
    }
}

fn last_component(parts: &[String]) -> Option<String> {
    let last = parts.last()?;
    let last = last.rsplit("::").next()?;
    Some(last.split('<').next().unwrap_or(last).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itanium_nested_names() {
        assert_eq!(demangle_itanium("__ZN3foo3barEv").as_deref(), Some("foo::bar"));
        assert_eq!(demangle_itanium("_ZN5Actor6updateEf").as_deref(), Some("Actor::update"));
        assert_eq!(demangle_itanium("_Z4mainv").as_deref(), Some("main"));
        assert_eq!(demangle_itanium("_ZL7g_state").as_deref(), Some("g_state"));
    }

    #[test]
    fn test_itanium_ctor_dtor_and_templates() {
        assert_eq!(demangle_itanium("_ZN3FooC1Ev").as_deref(), Some("Foo::Foo"));
        assert_eq!(demangle_itanium("_ZN3FooD2Ev").as_deref(), Some("Foo::~Foo"));
        assert_eq!(
            demangle_itanium("_ZNSt6vectorIiSaIiEE9push_backERKi").as_deref(),
            Some("std::vector<...>::push_back")
        );
    }

    #[test]
    fn test_non_itanium_names_are_declined() {
        assert_eq!(demangle_itanium("_$s3App0A8DelegateC"), None);
        assert_eq!(demangle_itanium("-[Networking start]"), None);
        assert_eq!(demangle_itanium("_ZN3fo"), None);
    }

    #[test]
    fn test_oversized_substitution_index_is_declined() {
        let mangled = format!("_ZN3fooS{}_3barEv", "Z".repeat(24));
        assert_eq!(demangle_itanium(&mangled), None);
        assert_eq!(ItaniumDemangler.demangle(&mangled), None);
        assert_eq!(display_name(Some(&ItaniumDemangler), &mangled), mangled);
    }

    #[test]
    fn test_display_name_falls_back() {
        assert_eq!(display_name(None, "_ZN3foo3barEv"), "_ZN3foo3barEv");
        assert_eq!(display_name(Some(&Passthrough), "_x"), "_x");
        assert_eq!(display_name(Some(&ItaniumDemangler), "_ZN3foo3barEv"), "foo::bar");

        let upper = |name: &str| Some(name.to_uppercase());
        assert_eq!(display_name(Some(&upper), "_abc"), "_ABC");

        let empty = |_: &str| Some(String::new());
        assert_eq!(display_name(Some(&empty), "_abc"), "_abc");
    }

    #[test]
    fn test_panicking_demangler_does_not_propagate() {
        let broken = |_: &str| -> Option<String> { panic!("demangler bug") };
        assert_eq!(display_name(Some(&broken), "_abc"), "_abc");
    }
}
