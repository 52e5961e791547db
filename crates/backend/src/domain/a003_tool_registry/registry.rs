use contracts::domain::a003_tool_registry::aggregate::ToolRegistryEntry;

/// Реестр доступных инструментов (секция `[[tools]]` конфига)
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolRegistryEntry>,
}

impl ToolRegistry {
    pub fn new(entries: Vec<ToolRegistryEntry>) -> Self {
        for entry in &entries {
            tracing::debug!(tool = %entry.tool_name, intents = ?entry.intents, "Registered tool");
        }
        Self { entries }
    }

    pub fn get(&self, tool_name: &str) -> Option<&ToolRegistryEntry> {
        self.entries.iter().find(|e| e.tool_name == tool_name)
    }

    /// Инструменты для набора intents в порядке intents, без повторов
    pub fn find_by_intents(&self, intents: &[String]) -> Vec<&ToolRegistryEntry> {
        let mut found: Vec<&ToolRegistryEntry> = Vec::new();
        for intent in intents {
            for entry in self.entries.iter().filter(|e| e.handles(intent)) {
                if !found.iter().any(|f| f.tool_name == entry.tool_name) {
                    found.push(entry);
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use contracts::domain::a003_tool_registry::aggregate::ToolRegistryEntry;

    pub fn entry(name: &str, intents: &[&str], endpoint: &str) -> ToolRegistryEntry {
        ToolRegistryEntry {
            tool_name: name.to_string(),
            intents: intents.iter().map(|s| s.to_string()).collect(),
            endpoint: endpoint.to_string(),
            input_schema: "SchemeMetadata".to_string(),
            output_schema: "SchemeExplanationResponse".to_string(),
            model: None,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::entry;
    use super::*;

    #[test]
    fn test_find_by_intents_dedupes_and_keeps_order() {
        let registry = ToolRegistry::new(vec![
            entry("SchemeExplainer", &["explain", "scheme_info"], "http://a"),
            entry("EligibilityChecker", &["check_eligibility"], "http://b"),
        ]);

        let intents = vec![
            "check_eligibility".to_string(),
            "explain".to_string(),
            "scheme_info".to_string(),
        ];
        let found: Vec<&str> = registry
            .find_by_intents(&intents)
            .iter()
            .map(|e| e.tool_name.as_str())
            .collect();
        assert_eq!(found, vec!["EligibilityChecker", "SchemeExplainer"]);

        assert!(registry.find_by_intents(&["greet".to_string()]).is_empty());
        assert_eq!(registry.get("SchemeExplainer").unwrap().endpoint, "http://a");
    }
}
