//! Toolchain command construction
//!
//! Builds the command sessions that configure and install one architecture.
//! Construction is pure: the same configuration, architecture and revision
//! always yield the same command lines in the same order.

use serde::Serialize;
use std::fmt;

use crate::config::defaults;
use crate::core::arch::Architecture;
use crate::core::registry::ArchRegistry;
use crate::core::settings::DistConfig;
use crate::error::DistError;
use crate::infra::toolchain::VsToolchain;

/// Ordered command lines executed as one script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSession {
    commands: Vec<String>,
}

impl CommandSession {
    /// Create a session from command lines
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    /// Command lines, in execution order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Render the session as script text
    pub fn to_script(&self) -> String {
        let mut script = self.commands.join("\n");
        script.push('\n');
        script
    }
}

impl fmt::Display for CommandSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            writeln!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Builds configure and install sessions
#[derive(Debug)]
pub struct CommandBuilder<'a> {
    registry: &'a ArchRegistry,
    toolchain: &'a VsToolchain,
}

impl<'a> CommandBuilder<'a> {
    /// Create a builder over the registry's workspaces
    pub fn new(registry: &'a ArchRegistry, toolchain: &'a VsToolchain) -> Self {
        Self {
            registry,
            toolchain,
        }
    }

    /// Commands that generate the NMake project for `arch`
    ///
    /// # Errors
    ///
    /// Returns [`DistError::CommandConstruction`] when the configuration asks
    /// for a revision and `revision` is missing or not a plain identifier.
    pub fn configure_commands(
        &self,
        config: &DistConfig,
        arch: Architecture,
        revision: Option<&str>,
    ) -> Result<CommandSession, DistError> {
        let workspace = self.registry.path_for(arch);
        let cmake = cmake_args(config, revision)?;

        Ok(CommandSession::new(vec![
            format!("cd /d \"{}\"", workspace.display()),
            format!(
                "call \"{}\" {}",
                self.toolchain.vcvarsall().display(),
                arch.configure_toolchain_id()
            ),
            format!("cmake {}", cmake.join(" ")),
        ]))
    }

    /// Commands that build and install `arch`
    pub fn install_commands(&self, arch: Architecture) -> CommandSession {
        let workspace = self.registry.path_for(arch);
        CommandSession::new(vec![
            format!(
                "call \"{}\" {}",
                defaults::VCVARSALL_FROM_ENV,
                arch.build_toolchain_id()
            ),
            format!("cd /d \"{}\"", workspace.display()),
            "nmake install".to_string(),
        ])
    }
}

/// Revision to embed, if the configuration asks for one
///
/// # Errors
///
/// Returns [`DistError::CommandConstruction`] when a revision is requested
/// and `revision` is missing or not a plain alphanumeric identifier.
pub fn checked_revision<'r>(
    config: &DistConfig,
    revision: Option<&'r str>,
) -> Result<Option<&'r str>, DistError> {
    if !config.include_revision {
        return Ok(None);
    }
    let revision = revision.ok_or_else(|| DistError::CommandConstruction {
        message: "revision requested but not resolved".to_string(),
    })?;
    if revision.is_empty() || !revision.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DistError::CommandConstruction {
            message: format!("revision '{revision}' is not a plain identifier"),
        });
    }
    Ok(Some(revision))
}

/// Arguments passed to cmake, in order
///
/// # Errors
///
/// Returns [`DistError::CommandConstruction`] for a requested but unusable
/// revision.
pub fn cmake_args(config: &DistConfig, revision: Option<&str>) -> Result<Vec<String>, DistError> {
    let mut args = vec![
        format!("-G \"{}\"", defaults::CMAKE_GENERATOR),
        format!("-DCMAKE_INSTALL_PREFIX={}", config.install_path.display()),
        format!("-DCMAKE_BUILD_TYPE={}", defaults::CMAKE_BUILD_TYPE),
    ];

    for component in &config.components {
        args.extend(component.cmake_flags().iter().map(|f| (*f).to_string()));
    }

    if let Some(revision) = checked_revision(config, revision)? {
        args.push(format!("-DGIT_HASH={revision}"));
    }

    args.push("-DZ3_USE_LIB_GMP=OFF".to_string());
    args.push("-DZ3_BUILD_LIBZ3_SHARED=ON".to_string());
    args.push(format!("\"{}\"", config.source_root.display()));
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::Component;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ArchRegistry, VsToolchain) {
        let temp = TempDir::new().unwrap();
        let registry = ArchRegistry::new(&temp.path().join("build-dist")).unwrap();
        (temp, registry, VsToolchain::default())
    }

    #[test]
    fn test_configure_command_order() {
        let (temp, registry, toolchain) = setup();
        let builder = CommandBuilder::new(&registry, &toolchain);
        let config = DistConfig::new(temp.path()).with_components([]);

        let session = builder
            .configure_commands(&config, Architecture::X64, None)
            .unwrap();
        let commands = session.commands();

        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[0],
            format!("cd /d \"{}\"", registry.path_for(Architecture::X64).display())
        );
        assert!(commands[1].starts_with("call "));
        assert!(commands[1].ends_with(" x64"));
        assert_eq!(
            commands[2],
            format!(
                "cmake -G \"NMake Makefiles\" -DCMAKE_INSTALL_PREFIX=dist \
                 -DCMAKE_BUILD_TYPE=RelWithDebInfo -DZ3_USE_LIB_GMP=OFF \
                 -DZ3_BUILD_LIBZ3_SHARED=ON \"{}\"",
                temp.path().display()
            )
        );
    }

    #[test]
    fn test_arm64_uses_cross_target_for_configure() {
        let (temp, registry, toolchain) = setup();
        let builder = CommandBuilder::new(&registry, &toolchain);
        let config = DistConfig::new(temp.path());

        let session = builder
            .configure_commands(&config, Architecture::Arm64, None)
            .unwrap();
        assert!(session.commands()[1].ends_with(" amd64_arm64"));
    }

    #[test]
    fn test_install_commands() {
        let (_temp, registry, toolchain) = setup();
        let builder = CommandBuilder::new(&registry, &toolchain);

        let session = builder.install_commands(Architecture::Arm64);
        let commands = session.commands();

        assert_eq!(
            commands[0],
            "call \"%VCINSTALLDIR%Auxiliary\\build\\vcvarsall.bat\" x64_arm64"
        );
        assert_eq!(
            commands[1],
            format!("cd /d \"{}\"", registry.path_for(Architecture::Arm64).display())
        );
        assert_eq!(commands[2], "nmake install");
    }

    #[test]
    fn test_revision_appended_before_fixed_flags() {
        let config = DistConfig::new("/z3").with_components([]).with_revision(true);
        let args = cmake_args(&config, Some("0123456789ab")).unwrap();

        let pos = args.iter().position(|a| a == "-DGIT_HASH=0123456789ab").unwrap();
        let gmp = args.iter().position(|a| a == "-DZ3_USE_LIB_GMP=OFF").unwrap();
        assert!(pos < gmp);
    }

    #[test]
    fn test_revision_ignored_when_not_requested() {
        let config = DistConfig::new("/z3");
        let args = cmake_args(&config, Some("0123456789ab")).unwrap();
        assert!(!args.iter().any(|a| a.starts_with("-DGIT_HASH")));
    }

    #[test]
    fn test_missing_revision_is_construction_error() {
        let config = DistConfig::new("/z3").with_revision(true);
        let result = cmake_args(&config, None);
        assert!(matches!(result, Err(DistError::CommandConstruction { .. })));
    }

    #[test]
    fn test_unsafe_revision_is_construction_error() {
        let config = DistConfig::new("/z3").with_revision(true);
        let result = cmake_args(&config, Some("abc && del *"));
        assert!(matches!(result, Err(DistError::CommandConstruction { .. })));
    }

    #[test]
    fn test_checked_revision() {
        let wanted = DistConfig::new("/z3").with_revision(true);
        assert_eq!(checked_revision(&wanted, Some("abc123")).unwrap(), Some("abc123"));
        assert!(checked_revision(&wanted, Some("abc&del")).is_err());
        assert!(checked_revision(&wanted, Some("")).is_err());

        let unwanted = DistConfig::new("/z3");
        assert_eq!(checked_revision(&unwanted, Some("abc&del")).unwrap(), None);
    }

    #[test]
    fn test_source_root_terminates_arguments() {
        let config = DistConfig::new(PathBuf::from("/work/z3"));
        let args = cmake_args(&config, None).unwrap();
        assert_eq!(args.last().unwrap(), "\"/work/z3\"");
    }

    #[test]
    fn test_script_rendering() {
        let session = CommandSession::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(session.to_script(), "a\nb\n");
    }

    fn component_subset() -> impl Strategy<Value = Vec<Component>> {
        prop::sample::subsequence(Component::ALL.to_vec(), 0..=3)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(defaults::MIN_PROPTEST_ITERATIONS))]

        /// Identical inputs always produce identical sessions
        #[test]
        fn prop_configure_is_deterministic(
            components in component_subset(),
            arch in prop::sample::select(Architecture::ALL.to_vec()),
            revision in prop::option::of("[0-9a-f]{12}")
        ) {
            let (temp, registry, toolchain) = setup();
            let builder = CommandBuilder::new(&registry, &toolchain);
            let config = DistConfig::new(temp.path())
                .with_components(components)
                .with_revision(revision.is_some());

            let first = builder.configure_commands(&config, arch, revision.as_deref()).unwrap();
            let second = builder.configure_commands(&config, arch, revision.as_deref()).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Enabling a component inserts exactly its flags and keeps the rest in order
        #[test]
        fn prop_component_adds_only_its_flags(
            components in component_subset(),
            extra in prop::sample::select(Component::ALL.to_vec())
        ) {
            prop_assume!(!components.contains(&extra));

            let base = DistConfig::new("/z3").with_components(components.clone());
            let mut with_extra = components;
            with_extra.push(extra);
            let extended = DistConfig::new("/z3").with_components(with_extra);

            let before = cmake_args(&base, None).unwrap();
            let after = cmake_args(&extended, None).unwrap();
            let flags: Vec<String> = extra.cmake_flags().iter().map(|f| f.to_string()).collect();

            prop_assert_eq!(after.len(), before.len() + flags.len());

            let remaining: Vec<String> = after
                .iter()
                .filter(|a| !flags.contains(a))
                .cloned()
                .collect();
            prop_assert_eq!(remaining, before);

            let start = after.iter().position(|a| *a == flags[0]).unwrap();
            prop_assert_eq!(&after[start..start + flags.len()], flags.as_slice());
        }
    }
}
