fn main() {
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=STRATA_BUILD_DATE={}", build_date);

    // Cargo sets PROFILE for build scripts only
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=STRATA_BUILD_PROFILE={}", profile);

    println!("cargo:rerun-if-changed=build.rs");
}
