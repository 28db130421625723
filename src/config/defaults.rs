//! Default configuration values

/// Product name used in archive names
pub const PRODUCT_NAME: &str = "z3";

/// Platform suffix used in archive names
pub const PLATFORM: &str = "win";

/// Default build root holding one workspace per architecture
pub const DEFAULT_BUILD_DIR: &str = "build-dist";

/// Default install prefix, relative to each workspace
pub const DEFAULT_INSTALL_DIR: &str = "dist";

/// Default release version
pub const DEFAULT_VERSION: &str = "4";

/// License file copied into every distribution
pub const LICENSE_FILE: &str = "LICENSE.txt";

/// Settings file looked up in the source root
pub const SETTINGS_FILE: &str = "z3dist.toml";

/// File written by a successful configure step (NMake generator)
pub const CONFIGURE_MARKER: &str = "Makefile";

/// Environment setup script used for the configure step
pub const DEFAULT_VCVARSALL: &str =
    r"C:\Program Files\Microsoft Visual Studio\2022\Enterprise\VC\Auxiliary\Build\vcvarsall.bat";

/// Environment setup script used for the install step, resolved by the shell
pub const VCVARSALL_FROM_ENV: &str = r"%VCINSTALLDIR%Auxiliary\build\vcvarsall.bat";

/// Prefix of the transient command script
pub const SCRIPT_PREFIX: &str = "z3_tmp";

/// Prefix of an archive being written, before it is renamed into place
pub const ARCHIVE_STAGING_PREFIX: &str = ".z3_archive";

/// CMake generator for the configure step
pub const CMAKE_GENERATOR: &str = "NMake Makefiles";

/// CMake build type for release distributions
pub const CMAKE_BUILD_TYPE: &str = "RelWithDebInfo";

/// Abbreviation length for `git show-ref`
pub const REVISION_ABBREV: usize = 12;

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
