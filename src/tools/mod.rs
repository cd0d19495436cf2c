//! Agent-facing tools
//!
//! Each tool wraps one plugin operation behind a typed input whose JSON schema
//! is published to the agent. The agent invokes tools by name with a JSON
//! argument object, see [`DynTool::call_json`].

mod morpho;
mod zero_ex;

use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use morpho::{
    MorphoBorrowTool, MorphoGetMarketInfoTool, MorphoGetMarketParamsTool, MorphoGetPositionTool,
    MorphoPlugin, MorphoRepayTool, MorphoSupplyCollateralTool, MorphoSupplyTool,
    MorphoWithdrawCollateralTool, MorphoWithdrawTool,
};
pub use zero_ex::{ZeroExGetPriceTool, ZeroExPlugin, ZeroExSwapTool};

/// Group of related tools sharing a name prefix
pub trait ToolBundle {
    const NAME: &'static str;

    fn description() -> &'static str;
}

pub struct ZeroExBundle;

impl ToolBundle for ZeroExBundle {
    const NAME: &'static str = "zero_ex";

    fn description() -> &'static str {
        "Token swaps through the 0x aggregation API"
    }
}

pub struct MorphoBundle;

impl ToolBundle for MorphoBundle {
    const NAME: &'static str = "morpho";

    fn description() -> &'static str {
        "Lending and borrowing on Morpho Blue markets"
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    type Bundle: ToolBundle;
    const LOCAL_NAME: &'static str;
    type Input: DeserializeOwned + JsonSchema + Send;
    type Output: Serialize + Send;

    fn description(&self) -> &'static str;

    async fn execute(&self, args: Self::Input) -> Result<Self::Output>;

    /// Name under which the agent calls the tool
    fn name(&self) -> &'static str {
        Self::LOCAL_NAME
    }

    /// Bundle-qualified name, e.g. `morpho/morpho_supply`
    fn qualified_name(&self) -> String {
        format!("{}/{}", <Self::Bundle as ToolBundle>::NAME, Self::LOCAL_NAME)
    }

    fn input_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Input)).unwrap_or(Value::Null)
    }
}

/// Object-safe view of a [`Tool`], for holding mixed tools in one registry
#[async_trait]
pub trait DynTool: Send + Sync {
    fn name(&self) -> &'static str;

    fn qualified_name(&self) -> String;

    fn description(&self) -> &'static str;

    fn input_schema(&self) -> Value;

    /// Deserialize `args` into the tool's input, execute, and serialize the
    /// output
    async fn call_json(&self, args: Value) -> Result<Value>;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn name(&self) -> &'static str {
        Tool::name(self)
    }

    fn qualified_name(&self) -> String {
        Tool::qualified_name(self)
    }

    fn description(&self) -> &'static str {
        Tool::description(self)
    }

    fn input_schema(&self) -> Value {
        Tool::input_schema(self)
    }

    async fn call_json(&self, args: Value) -> Result<Value> {
        let input: T::Input = serde_json::from_value(args)
            .map_err(|e| Error::validation("arguments", e.to_string()))?;
        let output = self.execute(input).await?;
        Ok(serde_json::to_value(output)?)
    }
}

/// Name, description and input schema of a registered tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub bundle_name: String,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn of(tool: &dyn DynTool) -> Self {
        Self {
            name: tool.name(),
            bundle_name: tool.qualified_name(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        }
    }
}

/// Find a tool by its agent-facing name
pub fn find<'a>(tools: &'a [Box<dyn DynTool>], name: &str) -> Option<&'a dyn DynTool> {
    tools
        .iter()
        .find(|t| t.name() == name || t.qualified_name() == name)
        .map(|t| t.as_ref())
}
