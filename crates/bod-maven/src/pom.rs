//! POM file parsing: project coordinates, parent reference, dependency
//! declarations, property interpolation.

use std::collections::BTreeMap;
use std::path::Path;

use bod_core::artifact::ArtifactKey;
use bod_util::errors::BodError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub modules: Vec<String>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ParentRef {
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(self.group_id.as_str(), self.artifact_id.as_str())
    }
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub type_: Option<String>,
}

impl PomDependency {
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(self.group_id.as_str(), self.artifact_id.as_str())
    }

    /// Whether this dependency participates in build-on-demand resolution.
    /// Test-scoped, system-scoped and optional dependencies do not.
    pub fn is_resolvable(&self) -> bool {
        if self.optional {
            return false;
        }
        !matches!(self.scope.as_deref(), Some("test") | Some("system"))
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Effective packaging, defaulting to `jar`.
    pub fn effective_packaging(&self) -> &str {
        self.packaging.as_deref().unwrap_or("jar")
    }

    /// Versionless key of this POM's project, when coordinates are complete.
    pub fn key(&self) -> Option<ArtifactKey> {
        let group = self.effective_group_id()?;
        let artifact = self.artifact_id.as_deref()?;
        Some(ArtifactKey::new(group, artifact))
    }

    /// Resolve `${property}` references using POM properties and built-in
    /// project variables.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        let mut iterations = 0;
        while result.contains("${") && iterations < 20 {
            iterations += 1;
            let mut new = result.clone();
            while let Some(start) = new.find("${") {
                let Some(end) = new[start..].find('}') else {
                    break;
                };
                let key = &new[start + 2..start + end];
                if let Some(val) = self.resolve_property(key) {
                    new = format!("{}{}{}", &new[..start], val, &new[start + end + 1..]);
                } else {
                    break;
                }
            }
            if new == result {
                break;
            }
            result = new;
        }
        result
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(|s| s.to_string()),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(|s| s.to_string()),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate all property references in dependency coordinates.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        for dep in &mut self.dependencies {
            dep.group_id = snapshot.interpolate(&dep.group_id);
            dep.artifact_id = snapshot.interpolate(&dep.artifact_id);
            if let Some(ref v) = dep.version {
                dep.version = Some(snapshot.interpolate(v));
            }
        }
    }
}

/// Parse a POM file from disk, with properties resolved.
pub fn load_pom(path: &Path) -> miette::Result<Pom> {
    let content = std::fs::read_to_string(path).map_err(|e| BodError::Pom {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    let mut pom = parse_pom(&content)?;
    pom.resolve_properties();
    Ok(pom)
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> miette::Result<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    let mut current_dep: Option<PomDependency> = None;
    let mut current_parent: Option<ParentRef> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                match path_context(&path).as_str() {
                    "project>dependencies>dependency" => {
                        current_dep = Some(PomDependency {
                            group_id: String::new(),
                            artifact_id: String::new(),
                            version: None,
                            scope: None,
                            optional: false,
                            type_: None,
                        });
                    }
                    "project>parent" => {
                        current_parent = Some(ParentRef {
                            group_id: String::new(),
                            artifact_id: String::new(),
                            version: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let depth = path.len();

                // Properties: <project><properties><key>value</key></properties>
                if depth == 3 && path.get(1).map(|s| s.as_str()) == Some("properties") {
                    let prop_name = path.last().cloned().unwrap_or_default();
                    pom.properties.insert(prop_name, text_buf.clone());
                }

                if let Some(ref mut dep) = current_dep {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") if ctx.ends_with(">dependency>groupId") => {
                            dep.group_id = text_buf.clone();
                        }
                        Some("artifactId") if ctx.ends_with(">dependency>artifactId") => {
                            dep.artifact_id = text_buf.clone();
                        }
                        Some("version") if ctx.ends_with(">dependency>version") => {
                            dep.version = Some(text_buf.clone());
                        }
                        Some("scope") if ctx.ends_with(">dependency>scope") => {
                            dep.scope = Some(text_buf.clone());
                        }
                        Some("optional") if ctx.ends_with(">dependency>optional") => {
                            dep.optional = text_buf.trim() == "true";
                        }
                        Some("type") if ctx.ends_with(">dependency>type") => {
                            dep.type_ = Some(text_buf.clone());
                        }
                        _ => {}
                    }
                    if ctx == "project>dependencies>dependency" {
                        if let Some(dep) = current_dep.take() {
                            pom.dependencies.push(dep);
                        }
                    }
                }

                if let Some(ref mut parent) = current_parent {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") if ctx == "project>parent>groupId" => {
                            parent.group_id = text_buf.clone();
                        }
                        Some("artifactId") if ctx == "project>parent>artifactId" => {
                            parent.artifact_id = text_buf.clone();
                        }
                        Some("version") if ctx == "project>parent>version" => {
                            parent.version = text_buf.clone();
                        }
                        _ => {}
                    }
                    if ctx == "project>parent" {
                        pom.parent = current_parent.take();
                    }
                }

                if depth == 2 {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") => pom.group_id = Some(text_buf.clone()),
                        Some("artifactId") => pom.artifact_id = Some(text_buf.clone()),
                        Some("version") => pom.version = Some(text_buf.clone()),
                        Some("packaging") => pom.packaging = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                if ctx == "project>modules>module" {
                    pom.modules.push(text_buf.clone());
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BodError::Pom {
                    message: format!("Failed to parse POM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(pom)
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}
