use chrono::{DateTime, Utc};
use ovnsnap_types::{Fleet, Role, sanitize_name_component};
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};

/// One scripted container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub index: usize,
    pub container_name: String,
    pub role: Role,
    pub hostname: String,
}

/// Everything the helper script embeds.
#[derive(Debug, Clone)]
pub struct ScriptContext {
    /// Engine executable the shortcuts call
    pub engine: String,
    /// Shell started by the index shortcuts
    pub shell: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ScriptEntry>,
}

impl ScriptContext {
    pub fn from_fleet(
        fleet: &Fleet,
        engine: impl Into<String>,
        shell: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let entries = fleet
            .iter()
            .map(|record| ScriptEntry {
                index: record.index,
                container_name: record.container_name.clone(),
                role: record.role,
                hostname: record.hostname.clone(),
            })
            .collect();

        Self {
            engine: engine.into(),
            shell: shell.into(),
            generated_at,
            entries,
        }
    }
}

/// Quote a value for POSIX shells.
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@'))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

const FUNCTIONS: &str = r#"
ovndb_show() {
    local i
    printf '%-6s %-24s %-5s %-36s %s\n' INDEX HOST ROLE CONTAINER SHORTCUT
    for i in "${!OVNDB_CONTAINERS[@]}"; do
        printf '%-6s %-24s %-5s %-36s %s\n' "$i" "${OVNDB_HOSTS[$i]}" "${OVNDB_ROLES[$i]}" \
            "${OVNDB_CONTAINERS[$i]}" "ovndb_$i"
    done
}

ovndb_cmd() {
    local index="$1"
    case "$index" in
        '' | *[!0-9]*)
            echo "ovndb_cmd: expected a database index, got '${index}' (see ovndb_show)" >&2
            return 1
            ;;
    esac
    if [ -z "${OVNDB_CONTAINERS[$index]+set}" ]; then
        echo "ovndb_cmd: no database with index ${index} (see ovndb_show)" >&2
        return 1
    fi
    shift
    "$OVNDB_ENGINE" exec "${OVNDB_CONTAINERS[$index]}" "$@"
}

ovndb_cmd_a() {
    local i
    for i in "${!OVNDB_CONTAINERS[@]}"; do
        echo "== [$i] ${OVNDB_CONTAINERS[$i]}"
        "$OVNDB_ENGINE" exec "${OVNDB_CONTAINERS[$i]}" "$@"
    done
}

_ovndb_cmd_role() {
    local role="$1" i
    shift
    for i in "${!OVNDB_CONTAINERS[@]}"; do
        if [ "${OVNDB_ROLES[$i]}" = "$role" ]; then
            echo "== [$i] ${OVNDB_CONTAINERS[$i]}"
            "$OVNDB_ENGINE" exec "${OVNDB_CONTAINERS[$i]}" "$@"
        fi
    done
}

ovndb_cmd_n() {
    _ovndb_cmd_role nb "$@"
}

ovndb_cmd_s() {
    _ovndb_cmd_role sb "$@"
}

ovndb_clean() {
    local i
    for i in "${!OVNDB_CONTAINERS[@]}"; do
        "$OVNDB_ENGINE" stop "${OVNDB_CONTAINERS[$i]}" >/dev/null 2>&1
        "$OVNDB_ENGINE" rm "${OVNDB_CONTAINERS[$i]}" >/dev/null 2>&1 &&
            echo "removed ${OVNDB_CONTAINERS[$i]}"
    done
}
"#;

/// Render the sourceable helper script.
///
/// Arrays are keyed by discovery index, so indices survive records that
/// were never launched.
pub fn render(ctx: &ScriptContext) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# ovnsnap helper functions, source with: . <this file>");
    let _ = writeln!(out, "# engine: {}", ctx.engine);
    let _ = writeln!(
        out,
        "# generated: {}",
        ctx.generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
    let _ = writeln!(out, "# databases: {}", ctx.entries.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "OVNDB_ENGINE={}", shell_quote(&ctx.engine));
    let _ = writeln!(out, "unset OVNDB_CONTAINERS OVNDB_ROLES OVNDB_HOSTS");
    let _ = writeln!(out, "declare -a OVNDB_CONTAINERS OVNDB_ROLES OVNDB_HOSTS");

    for entry in &ctx.entries {
        let _ = writeln!(
            out,
            "OVNDB_CONTAINERS[{}]={}",
            entry.index,
            shell_quote(&entry.container_name)
        );
        let _ = writeln!(out, "OVNDB_ROLES[{}]={}", entry.index, entry.role.tag());
        let _ = writeln!(
            out,
            "OVNDB_HOSTS[{}]={}",
            entry.index,
            shell_quote(&entry.hostname)
        );
    }

    out.push_str(FUNCTIONS);

    for entry in &ctx.entries {
        let _ = writeln!(out);
        let _ = writeln!(out, "ovndb_{}() {{", entry.index);
        let _ = writeln!(
            out,
            "    \"$OVNDB_ENGINE\" exec -it {} {}",
            shell_quote(&entry.container_name),
            shell_quote(&ctx.shell)
        );
        let _ = writeln!(out, "}}");

        let ctl = entry.role.spec().ctl;
        let tag = entry.role.tag();
        let _ = writeln!(
            out,
            "alias ovndb_{}ctl_{}='ovndb_cmd {} {}'",
            tag, entry.index, entry.index, ctl
        );
        let _ = writeln!(
            out,
            "alias ovndb_{}ctl_{}='ovndb_cmd {} {}'",
            tag,
            sanitize_name_component(&entry.hostname),
            entry.index,
            ctl
        );
    }

    out
}

/// Write the script, replacing any previous one.
pub fn write_script(path: &Path, content: &str) -> Result<()> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };

    write().map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(index: usize, role: Role, host: &str) -> ScriptEntry {
        ScriptEntry {
            index,
            container_name: format!("ovndb_{}_{}", role.tag(), host),
            role,
            hostname: host.to_string(),
        }
    }

    fn context(entries: Vec<ScriptEntry>) -> ScriptContext {
        ScriptContext {
            engine: "docker".to_string(),
            shell: "/bin/bash".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            entries,
        }
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("worker-1"), "worker-1");
        assert_eq!(shell_quote("/usr/bin/docker"), "/usr/bin/docker");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("my host"), "'my host'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_header() {
        let script = render(&context(vec![entry(0, Role::Northbound, "worker-1")]));
        insta::assert_snapshot!(script.lines().take(9).collect::<Vec<_>>().join("\n"), @r"
        # ovnsnap helper functions, source with: . <this file>
        # engine: docker
        # generated: 2026-01-02T03:04:05Z
        # databases: 1

        OVNDB_ENGINE=docker
        unset OVNDB_CONTAINERS OVNDB_ROLES OVNDB_HOSTS
        declare -a OVNDB_CONTAINERS OVNDB_ROLES OVNDB_HOSTS
        OVNDB_CONTAINERS[0]=ovndb_nb_worker-1
        ");
    }

    #[test]
    fn test_sparse_indices_are_kept() {
        let script = render(&context(vec![
            entry(0, Role::Northbound, "worker-1"),
            entry(2, Role::Southbound, "worker-2"),
        ]));

        assert!(script.contains("OVNDB_CONTAINERS[2]=ovndb_sb_worker-2\n"));
        assert!(script.contains("ovndb_2() {\n"));
        assert!(!script.contains("ovndb_1() {"));
        assert!(script.contains("alias ovndb_sbctl_2='ovndb_cmd 2 ovn-sbctl'\n"));
        assert!(script.contains("alias ovndb_sbctl_worker-2='ovndb_cmd 2 ovn-sbctl'\n"));
    }

    #[test]
    fn test_awkward_hostname_is_quoted() {
        let script = render(&context(vec![entry(0, Role::Northbound, "edge node")]));
        assert!(script.contains("OVNDB_HOSTS[0]='edge node'\n"));
        assert!(script.contains("alias ovndb_nbctl_edge_node='ovndb_cmd 0 ovn-nbctl'\n"));
    }

    #[test]
    fn test_write_script_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("helpers.sh");
        write_script(&path, "echo hi\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "echo hi\n");
    }

    #[test]
    fn test_write_script_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let err = write_script(&blocker.join("helpers.sh"), "x").unwrap_err();
        assert!(err.to_string().contains("helpers.sh"));
    }
}
