//! Chinese script conversion
//!
//! Pure table lookup: phrase entries are tried longest-first at each position,
//! then single characters. Anything unmapped passes through unchanged, so
//! conversion is total and never fails. No table value appears as a
//! character key, which makes conversion idempotent.

use once_cell::sync::Lazy;
use shici_common::config::ConversionMode;
use std::collections::HashMap;

/// Traditional → simplified character pairs, two characters per entry
const T2S_CHARS: &str = "
軾轼鸛鹳渙涣萬万與与專专業业叢丛東东絲丝兩两嚴严喪丧個个豐丰臨临為为爲为麗丽舉举義义烏乌樂乐
喬乔習习鄉乡書书買买亂乱爭争於于虧亏雲云亞亚產产畝亩親亲億亿僅仅從从侖仑倉仓儀仪
們们優优會会傘伞偉伟傳传傷伤倫伦偽伪體体餘余俠侠侶侣偵侦側侧僑侨儂侬儔俦儼俨倆俩
儷俪儉俭債债傾倾償偿儲储兌兑兒儿黨党蘭兰關关興兴養养獸兽岡冈冊册寫写軍军農农馮冯
衝冲決决況况凍冻淨净涼凉減减湊凑凜凛幾几鳳凤憑凭凱凯擊击劃划劉刘則则剛刚創创刪删
別别劍剑劑剂勁劲動动務务勝胜勞劳勢势勵励勸劝勻匀匯汇彙汇區区醫医華华協协單单賣卖
盧卢衛卫卻却廠厂廳厅曆历歷历厲厉壓压厭厌廁厕廂厢廈厦廚厨縣县參参雙双發发髮发變变
敘叙疊叠號号嘆叹嚇吓呂吕嗎吗聽听啟启吳吴員员嗚呜詠咏嚨咙響响啞哑問问喚唤喲哟嘗尝
噴喷嘯啸嚮向團团園园圍围圖图圓圆國国聖圣場场壞坏塊块堅坚壇坛墳坟墜坠壘垒塵尘塹堑
墊垫壩坝壯壮聲声壺壶處处備备復复複复夠够頭头夾夹奪夺奮奋獎奖婦妇媽妈嫵妩嬌娇孫孙
學学寧宁寶宝實实寵宠審审寬宽賓宾寢寝對对尋寻導导將将爾尔層层屬属屢屡嶺岭嶽岳島岛
峽峡崗岗巖岩巔巅峯峰幣币師师帳帐帶带幫帮幹干乾干庫库廟庙廣广廬庐開开異异棄弃張张
彌弥彈弹彎弯歸归當当錄录彥彦徹彻徑径後后憶忆懺忏憂忧懷怀態态憐怜總总懟怼戀恋懇恳
惡恶惱恼悵怅悶闷驚惊慘惨慚惭懼惧慣惯願愿應应懶懒戰战戲戏戶户擔担擁拥擇择擋挡揚扬
換换揮挥損损搖摇攜携攝摄擺摆擬拟攬揽擾扰擴扩掃扫掛挂撲扑敵敌數数斂敛斬斩斷断無无
舊旧時时晝昼顯显暫暂曬晒曉晓暈晕暢畅朧胧朮术楊杨條条極极樹树橋桥機机檢检權权樣样
標标棟栋櫻樱欄栏檻槛櫃柜槍枪楓枫樓楼榮荣歡欢歲岁殘残殺杀殼壳氣气漢汉湯汤溝沟沒没
滄沧滅灭滿满漁渔濃浓淺浅溫温潤润澗涧濤涛灣湾瀟潇瀾澜灑洒漲涨濕湿淚泪潔洁淪沦漿浆
瀉泻澤泽濁浊濱滨瀨濑灘滩潛潜漸渐爐炉燈灯燭烛煙烟熱热燒烧營营爍烁煩烦燦灿爺爷牆墙
牽牵犧牺猶犹獵猎獨独獄狱狹狭獅狮瑤瑶環环瓊琼瑪玛現现畫画畢毕瘋疯療疗癢痒盞盏監监
盡尽盤盘眾众衆众睜睁瞞瞒矯矫礎础確确礦矿禮礼禪禅禍祸離离禿秃種种稱称穩稳積积穌稣
窮穷竊窃窩窝競竞筆笔節节範范簡简簾帘籃篮籠笼糧粮糾纠紀纪約约紅红紙纸級级紛纷細细
終终組组結结絕绝經经綠绿維维網网緣缘練练縱纵織织繡绣繞绕繩绳續续纏缠線线綫线緊紧
綿绵編编縷缕緩缓績绩繪绘紡纺罷罢羅罗羨羡翹翘聯联聰聪職职肅肃脅胁腦脑腳脚膽胆臉脸
腸肠膚肤臘腊臺台艦舰艱艰藝艺蒼苍葉叶蓋盖蓮莲蕭萧薦荐藥药蘆芦蘇苏蘊蕴薩萨莊庄獲获
蔣蒋蘋苹蟬蝉蠶蚕蟲虫螢萤蝦虾補补裝装襲袭見见規规視视覺觉覽览觀观訂订計计記记許许
詩诗詞词話话誰谁調调談谈請请論论諸诸謝谢識识譜谱護护讀读讓让語语說说誤误認认設设
訴诉試试詢询該该詳详誠诚謀谋謠谣謎谜議议譏讥豈岂貝贝負负財财貧贫貴贵賀贺資资賞赏
賤贱賢贤賦赋質质貸贷費费賊贼賜赐賴赖贈赠趙赵趨趋躍跃蹤踪車车軒轩軟软載载輕轻輝辉
輪轮輩辈轉转較较輸输轍辙辭辞這这連连進进遊游運运過过達达違违遙遥遠远適适遲迟遷迁
選选遺遗還还邊边邁迈週周迴回鄰邻鄭郑醜丑釣钓鈴铃鉤钩銀银銅铜鋒锋錢钱錦锦鍾钟鐘钟
鏡镜鐵铁鎖锁錯错鍋锅鑄铸長长門门閃闪閉闭閑闲閒闲間间閣阁閨闺闊阔闌阑闖闯閱阅陣阵
陳陈陸陆陰阴陽阳隊队隨随險险隱隐際际隻只雖虽雜杂雞鸡難难電电霧雾靈灵靜静韋韦韓韩
韻韵頁页頂顶項项順顺須须頌颂預预頓顿領领頰颊題题額额顏颜顛颠類类顧顾風风颯飒飄飘
飛飞飢饥饑饥飯饭飲饮飽饱館馆餅饼餓饿馬马馳驰駐驻駕驾騎骑騰腾驅驱驕骄驛驿驗验鬢鬓
鬥斗鬆松魚鱼魯鲁鮮鲜鳥鸟鳴鸣鴉鸦鴛鸳鴦鸯鴻鸿鵑鹃鵝鹅鵲鹊鶯莺鶴鹤鷗鸥鷺鹭鸞鸾鷹鹰
鹽盐麥麦麵面麼么黃黄點点齊齐齒齿龍龙龜龟龔龚歐欧聞闻夢梦來来裡里裏里穀谷採采僕仆
製制準准係系繫系驪骊櫓橹綺绮嬋婵嫋袅裊袅鬱郁蕪芜簫箫騷骚贊赞讚赞歎叹鐫镌闕阙樞枢
璣玑彫雕鵬鹏鯨鲸駒驹驟骤驢驴驂骖紈纨綸纶緋绯縞缟縈萦繚缭纓缨纖纤蘿萝薊蓟蓽荜葦苇
蒓莼蕩荡蕎荞薔蔷藹蔼擷撷攏拢擲掷攤摊搗捣撥拨撫抚諫谏謁谒謫谪諳谙諧谐謙谦謬谬譚谭
譴谴讒谗讖谶詐诈誇夸誦诵誕诞訣诀訪访訟讼証证評评詛诅詣诣諍诤諾诺謂谓誼谊鄒邹塢坞
壚垆墻墙廢废慶庆憲宪懸悬戔戋戧戗閩闽閭闾闈闱闔阖闐阗闡阐閬阆隴陇陝陕陘陉漣涟漵溆
潯浔澠渑瀅滢瀋沈灤滦濰潍灕漓瀝沥瀧泷潰溃滯滞滲渗渦涡渾浑溼湿淒凄悽凄蓴莼萊莱鳧凫
嬰婴攖撄纍累甌瓯紓纾綬绶綢绸綽绰緻致縫缝繹绎纜缆覓觅覲觐觴觞賒赊賬账賽赛贏赢贍赡
踐践躊踌軀躯輿舆轎轿轟轰釵钗鈿钿銜衔銷销鋪铺錫锡鍛锻鑑鉴鑒鉴闋阕雛雏霽霁靄霭韁缰
頹颓顆颗顫颤颺飏餞饯饒饶駛驶駿骏騁骋驃骠髒脏鬧闹鱗鳞鴣鸪鵠鹄鷓鹧鷲鹫鸚鹦鵡鹉黌黉
齡龄齣出衹只祇只檯台颱台蠟蜡蠻蛮螻蝼蟻蚁藍蓝訊讯
";

/// Phrases whose characters must not be converted one by one
const T2S_PHRASES: &[(&str, &str)] = &[
    ("乾坤", "乾坤"),
    ("乾隆", "乾隆"),
    ("乾元", "乾元"),
];

/// Hong Kong variant characters on top of the base table
const HK_CHARS: &str = "
衞卫僞伪啓启羣群銹锈鷄鸡
";

/// Taiwan usage differences (words, not characters)
const TW_PHRASES: &[(&str, &str)] = &[
    ("計程車", "出租车"),
    ("軟體", "软件"),
    ("網路", "网络"),
    ("資訊", "信息"),
    ("滑鼠", "鼠标"),
];

fn parse_pairs(pairs: &str) -> HashMap<char, char> {
    let chars: Vec<char> = pairs.chars().filter(|c| !c.is_whitespace()).collect();
    chars.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

static T2S_CHAR_TABLE: Lazy<HashMap<char, char>> = Lazy::new(|| parse_pairs(T2S_CHARS));

static HK_CHAR_TABLE: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut table = T2S_CHAR_TABLE.clone();
    table.extend(parse_pairs(HK_CHARS));
    table
});

/// Character/phrase substitution for one conversion mode
#[derive(Debug, Clone)]
pub struct ScriptConverter {
    mode: ConversionMode,
    chars: Option<&'static HashMap<char, char>>,
    /// Sorted longest first
    phrases: Vec<(Vec<char>, String)>,
}

impl ScriptConverter {
    pub fn new(mode: ConversionMode) -> Self {
        let (chars, phrase_sets): (Option<&'static HashMap<char, char>>, Vec<&[(&str, &str)]>) =
            match mode {
                ConversionMode::TraditionalToSimplified => {
                    (Some(&*T2S_CHAR_TABLE), vec![T2S_PHRASES])
                }
                ConversionMode::HongKongToMainland => (Some(&*HK_CHAR_TABLE), vec![T2S_PHRASES]),
                ConversionMode::TaiwanToMainland => {
                    (Some(&*T2S_CHAR_TABLE), vec![T2S_PHRASES, TW_PHRASES])
                }
                ConversionMode::Identity => (None, Vec::new()),
            };

        let mut phrases: Vec<(Vec<char>, String)> = phrase_sets
            .into_iter()
            .flatten()
            .map(|(from, to)| (from.chars().collect(), to.to_string()))
            .collect();
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            mode,
            chars,
            phrases,
        }
    }

    /// Converter that returns its input unchanged
    pub fn identity() -> Self {
        Self::new(ConversionMode::Identity)
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Convert `text`; always succeeds
    pub fn convert(&self, text: &str) -> String {
        let Some(chars) = self.chars else {
            return text.to_string();
        };

        let input: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        'outer: while i < input.len() {
            for (from, to) in &self.phrases {
                if input[i..].starts_with(from) {
                    out.push_str(to);
                    i += from.len();
                    continue 'outer;
                }
            }
            let c = input[i];
            out.push(chars.get(&c).copied().unwrap_or(c));
            i += 1;
        }

        out
    }
}

impl Default for ScriptConverter {
    fn default() -> Self {
        Self::new(ConversionMode::default())
    }
}
