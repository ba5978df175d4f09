//! Sync passes over realistic manifests from `test-fixtures/manifests`.

use pretty_assertions::assert_eq;
use projsync_core::{SyncConfig, SyncEngine};
use projsync_fs::RelativePath;
use projsync_manifest::{Category, ManifestDocument};
use projsync_test_utils::TestProject;

const CLASSIC_WEB: &str = include_str!("../../../test-fixtures/manifests/ClassicWeb.csproj");
const SDK_CONSOLE: &str = include_str!("../../../test-fixtures/manifests/SdkConsole.csproj");

const PROJECT_REFERENCE: &str = "    <ProjectReference Include=\"..\\Core\\Core.csproj\">\n      <Project>{A1B2C3D4-0000-0000-0000-000000000000}</Project>\n    </ProjectReference>\n";

fn no_backup() -> SyncConfig {
    SyncConfig {
        write_backup: false,
        ..SyncConfig::default()
    }
}

/// The classic project with its surviving files plus a few new ones.
fn classic_web(manifest: &str) -> TestProject {
    TestProject::new()
        .named("ClassicWeb.csproj")
        .with_manifest_text(manifest)
        .with_file("Controllers/HomeController.cs", "")
        .with_file("Global.asax", "")
        .with_file("Global.asax.cs", "")
        .with_file("Views/Home/Index.cshtml", "")
        .with_file("Web.config", "")
        .with_file("packages.config", "")
        .with_file("Generated/Proxy.cs", "")
        .with_file("Models/User.cs", "")
        .with_file("Content/site.css", "")
        .with_file("Styles/main.scss", "")
        .with_file("bin/ClassicWeb.dll", "")
        .with_file("obj/Debug/ClassicWeb.pdb", "")
        .with_file("ClassicWeb.csproj.user", "")
}

#[test]
fn test_classic_fixture_parses() {
    let doc = ManifestDocument::parse(CLASSIC_WEB).unwrap();

    assert_eq!(doc.groups().len(), 5);
    assert!(doc.groups()[3].conditional);
    let tracked: Vec<_> = doc.tracked_paths().iter().map(|p| p.to_string()).collect();
    assert_eq!(
        tracked,
        vec![
            "Controllers\\HomeController.cs",
            "Global.asax.cs",
            "Models\\Deleted.cs",
            "Global.asax",
            "Views\\Home\\Index.cshtml",
            "Scripts\\removed.js",
            "Web.config",
            "packages.config",
            "debug.txt",
        ]
    );
}

#[test]
fn test_classic_project_pass() {
    let project = classic_web(CLASSIC_WEB);
    let engine = SyncEngine::new(project.root(), no_backup()).unwrap();

    let pass = engine.run_pass().unwrap();

    let added: Vec<_> = pass
        .added
        .iter()
        .map(|c| (c.path.to_string(), c.category))
        .collect();
    assert_eq!(
        added,
        vec![
            ("Content\\site.css".to_string(), Category::Content),
            ("Models\\User.cs".to_string(), Category::Compile),
            ("Styles\\main.scss".to_string(), Category::None),
        ]
    );
    let removed: Vec<_> = pass.removed.iter().map(|c| c.path.to_string()).collect();
    assert_eq!(
        removed,
        vec!["debug.txt", "Models\\Deleted.cs", "Scripts\\removed.js"]
    );

    let expected = CLASSIC_WEB
        .replace("    <Compile Include=\"Models\\Deleted.cs\" />\n", "")
        .replace("    <Content Include=\"Scripts\\removed.js\" />\n", "")
        .replace("    <Content Include=\"debug.txt\" />\n", "")
        .replace(
            PROJECT_REFERENCE,
            &format!(
                "{}    <Content Include=\"Content\\site.css\" />\n    <Compile Include=\"Models\\User.cs\" />\n    <None Include=\"Styles\\main.scss\" />\n",
                PROJECT_REFERENCE
            ),
        );
    assert_eq!(project.read_manifest(), expected);
}

#[test]
fn test_classic_project_keeps_untracked_items() {
    let project = classic_web(CLASSIC_WEB);
    let engine = SyncEngine::new(project.root(), no_backup()).unwrap();

    engine.run_pass().unwrap();

    project.assert_manifest_contains("<Reference Include=\"Newtonsoft.Json, Version=6.0.0.0, Culture=neutral\">");
    project.assert_manifest_contains("<Compile Include=\"..\\Shared\\AssemblyVersion.cs\">");
    project.assert_manifest_contains("<Compile Include=\"Generated\\*.cs\" />");
    project.assert_manifest_contains("<ProjectReference Include=\"..\\Core\\Core.csproj\">");
    // covered by the wildcard include
    project.assert_manifest_lacks("Generated\\Proxy.cs");
    project.assert_manifest_lacks("ClassicWeb.dll");
    project.assert_manifest_lacks("csproj.user");
}

#[test]
fn test_classic_project_auto_organize() {
    let project = classic_web(CLASSIC_WEB);
    let config = SyncConfig {
        auto_organize: true,
        ..no_backup()
    };
    let engine = SyncEngine::new(project.root(), config).unwrap();

    engine.run_pass().unwrap();

    let manifest = project.read_manifest();
    project.assert_manifest_contains(
        "    <Compile Include=\"Generated\\*.cs\" />\n    <Compile Include=\"Models\\User.cs\" />\n  </ItemGroup>",
    );
    project.assert_manifest_contains(
        "    <None Include=\"packages.config\" />\n    <Content Include=\"Content\\site.css\" />\n  </ItemGroup>",
    );
    // no reserved None group in this manifest, so it falls back to the last one
    assert!(manifest.contains(&format!(
        "{}    <None Include=\"Styles\\main.scss\" />\n  </ItemGroup>",
        PROJECT_REFERENCE
    )));
}

#[test]
fn test_classic_project_crlf_is_preserved() {
    let crlf = CLASSIC_WEB.replace('\n', "\r\n");
    let project = classic_web(&crlf);
    let engine = SyncEngine::new(project.root(), no_backup()).unwrap();

    assert!(engine.run_pass().unwrap().mutated);

    let manifest = project.read_manifest();
    assert!(manifest.contains("<Compile Include=\"Models\\User.cs\" />\r\n"));
    assert_eq!(manifest.matches('\n').count(), manifest.matches("\r\n").count());
}

#[test]
fn test_sdk_project_gets_item_group() {
    let project = TestProject::new()
        .named("SdkConsole.csproj")
        .with_manifest_text(SDK_CONSOLE)
        .with_file("Program.cs", "")
        .with_file("appsettings.json", "")
        .with_file("obj/project.assets.json", "");
    let engine = SyncEngine::new(project.root(), no_backup()).unwrap();

    engine.run_pass().unwrap();

    assert_eq!(
        project.read_manifest(),
        SDK_CONSOLE.replace(
            "</Project>",
            "  <ItemGroup>\n    <Content Include=\"appsettings.json\" />\n    <Compile Include=\"Program.cs\" />\n  </ItemGroup>\n</Project>"
        )
    );

    let second = engine.run_pass().unwrap();
    assert!(!second.mutated);
}

#[test]
fn test_sdk_project_pass_is_reported_in_json() {
    let project = TestProject::new()
        .named("SdkConsole.csproj")
        .with_manifest_text(SDK_CONSOLE)
        .with_file("Program.cs", "");
    let engine = SyncEngine::new(project.root(), no_backup()).unwrap();

    let planned = engine.plan().unwrap();
    let json = serde_json::to_value(&planned.pass).unwrap();

    assert_eq!(json["added"][0]["element"], "Compile");
    assert_eq!(json["backup"], serde_json::Value::Null);
    assert_eq!(project.read_manifest(), SDK_CONSOLE);
    assert!(planned.after.contains("<Compile Include=\"Program.cs\" />"));
    assert!(
        engine
            .plan()
            .unwrap()
            .pass
            .added
            .iter()
            .any(|c| c.path == RelativePath::new("program.CS"))
    );
}
