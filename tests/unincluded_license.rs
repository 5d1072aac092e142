use std::path::Path;

#[test]
fn license_files_exist() {
	for file in &["LICENSE-APACHE", "LICENSE-MIT"] {
		assert!(Path::new(env!("CARGO_MANIFEST_DIR")).join(file).is_file(), "missing {}", file);
	}
}

#[test]
fn readme_links_licenses() {
	version_sync::assert_contains_regex!("README.md", r"\(LICENSE-APACHE\)");
	version_sync::assert_contains_regex!("README.md", r"\(LICENSE-MIT\)");
}
