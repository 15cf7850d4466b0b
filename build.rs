use std::{env, process::Command};

// records the version of the compiler building us, `rustc 1.70.0 (90c541806 2023-05-31)`
fn main() {
	let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_owned());
	let version = Command::new(rustc)
		.arg("--version")
		.output()
		.ok()
		.filter(|output| output.status.success())
		.and_then(|output| String::from_utf8(output.stdout).ok())
		.and_then(|stdout| stdout.split_whitespace().nth(1).map(str::to_owned))
		.unwrap_or_else(|| "unknown".to_owned());

	println!("cargo:rustc-env=ALERTMANAGER2ES_RUSTC_VERSION={}", version);
	println!("cargo:rerun-if-env-changed=RUSTC");
	println!("cargo:rerun-if-changed=build.rs");
}
