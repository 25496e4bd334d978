// Default prompts for every optimizer operation. The product speaks Chinese,
// so the prompts (and therefore the model's answers) are Chinese too.

/// Prefix for literal résumé text sent after the prompt.
pub const RESUME_TEXT_PREFIX: &str = "以下是简历内容：\n";

/// General optimization advice.
pub const OPTIMIZE_PROMPT: &str = "请分析这份简历并提供详细的优化建议。请从以下几个方面进行分析：

1. **内容结构**：评估简历的整体结构和信息组织
2. **关键词优化**：建议添加相关的行业关键词和技能
3. **成就量化**：指出哪些成就可以用数字和具体数据来强化
4. **格式改进**：提供格式和排版的改进建议
5. **针对性调整**：根据目标职位提供针对性的修改建议

请用中文回复，并提供具体可操作的改进建议。";

/// Job-targeted optimization. Replace `{job_description}` before sending.
pub const JOB_POSITION_PROMPT_TEMPLATE: &str = "请根据以下职位描述来优化这份简历：

**目标职位描述：**
{job_description}

**优化要求：**
1. 突出与目标职位相关的技能和经验
2. 调整关键词以匹配职位要求
3. 重新组织内容以强调最相关的成就
4. 提供具体的修改建议和原因说明

请用中文回复，并提供详细的优化建议。";

/// A 100–150 character professional summary.
pub const SUMMARY_PROMPT: &str = "请为这份简历生成一个简洁的专业摘要，包括：

1. **核心技能总结**
2. **工作经验亮点**
3. **职业发展方向**
4. **独特价值主张**

摘要应该在 100-150 字之间，用中文回复。";

/// Fixed-format template. The section and key names here are exactly the
/// vocabulary `template::parse_template` understands.
pub const TEMPLATE_PROMPT: &str = "请根据提供的简历内容，生成一份完整的、格式化的简历。请严格按照以下格式输出，使用固定变量：

## 个人信息
姓名：{{Name}}
联系电话：{{Phone}}
邮箱：{{Email}}
居住地址：{{Address}}
LinkedIn：{{LinkedIn}}
GitHub：{{GitHub}}

## 求职意向
目标职位：{{TargetPosition}}
期望薪资：{{ExpectedSalary}}
工作地点：{{PreferredLocation}}

## 专业技能
{{Skills}}

## 工作经验
{{WorkExperience}}

## 教育背景
{{Education}}

## 项目经验
{{Projects}}

## 获奖荣誉
{{Awards}}

## 自我评价
{{SelfEvaluation}}

请根据原始简历内容，填充以上模板中的所有变量。对于缺失的信息，请根据现有信息进行合理推断和补充。
- 技能部分请按类别分组（如：编程语言、框架、工具等）
- 工作经验请按时间倒序排列，包含公司名称、职位、时间、主要职责和成就
- 项目经验请突出技术栈和个人贡献
- 所有内容都要具体、量化，避免空泛的描述

请直接输出填充好的完整简历内容，不要包含任何解释或说明。";

pub fn job_position_prompt(job_description: &str) -> String {
    JOB_POSITION_PROMPT_TEMPLATE.replace("{job_description}", job_description.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_template;

    #[test]
    fn test_job_position_prompt_embeds_description() {
        let prompt = job_position_prompt("  负责后端服务开发  ");
        assert!(prompt.contains("**目标职位描述：**\n负责后端服务开发\n"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_template_prompt_uses_parser_vocabulary() {
        // Every section in the prompt must be recognized by the parser.
        let parsed = parse_template(TEMPLATE_PROMPT);
        assert!(parsed.unrecognized_sections.is_empty());
    }
}
