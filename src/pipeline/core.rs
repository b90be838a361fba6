use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::PipeMap;
use tracing::debug;

pub trait PipeNode {
    fn name(&self) -> String;

    fn input(&self) -> Vec<String>;

    fn output(&self) -> Vec<String>;

    fn process(&self, data: PipeMap) -> PipelineResult<PipeMap>;

    fn validate_input(&self, data: &PipeMap) -> PipelineResult<()> {
        for input in self.input() {
            let is_optional = input.ends_with('?');
            let clean_input = input.trim_end_matches('?');

            if !is_optional && !data.contains_key(clean_input) {
                return Err(PipelineError::missing_input(self.name(), clean_input));
            }
        }
        Ok(())
    }

    fn validate_output(&self, data: &PipeMap) -> PipelineResult<()> {
        for output in self.output() {
            // Outputs are always required
            if !data.contains_key(&output) {
                return Err(PipelineError::missing_output(self.name(), output));
            }
        }
        Ok(())
    }
}

pub struct Pipeline {
    nodes: Vec<Box<dyn PipeNode>>,
    name: String,
    external_inputs: Vec<String>,
}

impl Pipeline {
    pub fn new(name: &str) -> Self {
        Self {
            nodes: Vec::new(),
            name: name.to_string(),
            external_inputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set external inputs that will be provided via initial PipeMap
    pub fn with_external_inputs(mut self, external_inputs: Vec<String>) -> Self {
        self.external_inputs = external_inputs;
        self
    }

    /// Names of the nodes in execution order
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    pub fn add_node(mut self, node: Box<dyn PipeNode>) -> PipelineResult<Self> {
        let current_inputs = node.input();
        let mut available_sources: Vec<String> = self.external_inputs.clone();
        for existing_node in &self.nodes {
            available_sources.extend(existing_node.output());
        }

        let missing_inputs: Vec<&String> = current_inputs
            .iter()
            .filter(|input| !input.ends_with('?'))
            .filter(|input| !available_sources.iter().any(|s| s == *input))
            .collect();

        if !missing_inputs.is_empty() {
            return Err(PipelineError::invalid_config(format!(
                "Node '{}' requires inputs {:?} that are not available.\n\
                 Available sources (previous node outputs + external inputs): {:?}",
                node.name(),
                missing_inputs,
                available_sources,
            )));
        }

        debug!(
            "Adding node '{}' to pipeline '{}'. Inputs: {:?}, Available sources: {:?}",
            node.name(),
            self.name,
            current_inputs,
            available_sources
        );

        self.nodes.push(node);
        Ok(self)
    }

    pub fn execute(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        debug!(
            "Executing pipeline '{}' with {} nodes",
            self.name,
            self.nodes.len()
        );

        for (index, node) in self.nodes.iter().enumerate() {
            debug!("Processing node {}: '{}'", index + 1, node.name());

            node.validate_input(&data)?;
            data = node.process(data)?;
            node.validate_output(&data)?;

            debug!("Node '{}' processed successfully", node.name());
        }

        debug!("Pipeline '{}' executed successfully", self.name);
        Ok(data)
    }
}
